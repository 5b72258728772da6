//! Request-scoped query pipeline: binding, sort mapping and data shaping.

pub mod parameters;
pub mod property_mapping;
pub mod shaping;

pub use parameters::{
    encode_component, ParameterError, ResourceQueryParameters, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use property_mapping::{
    PropertyMapping, PropertyMappingError, PropertyMappingService, PropertyMappingValue,
};
pub use shaping::{shape, shape_all, type_has_properties, ShapeableResource, ShapingError};
