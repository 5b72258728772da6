pub mod library;
pub mod query;

// Re-export key types for convenience
pub use library::{AuthorService, BookService, UpsertOutcome};
pub use query::{
    encode_component, shape, shape_all, type_has_properties, ParameterError, PropertyMapping,
    PropertyMappingError, PropertyMappingService, ResourceQueryParameters, ShapeableResource,
    ShapingError, MAX_PAGE_SIZE,
};
