//! Data shaping: keep only the requested properties of a resource.
//!
//! `fields` is a comma-separated list of property names matched
//! case-insensitively against the resource's serialized names. The shaped
//! object keeps the canonical (camelCase) key of each property.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapingError {
    #[error("Property '{0}' wasn't found")]
    UnknownField(String),

    #[error("Resource could not be serialized: {0}")]
    Serialization(String),
}

/// A resource that can be shaped. `FIELDS` lists its serialized property
/// names in output order.
pub trait ShapeableResource: Serialize {
    const FIELDS: &'static [&'static str];
}

fn resolve<T: ShapeableResource>(field: &str) -> Result<&'static str, ShapingError> {
    T::FIELDS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(field))
        .copied()
        .ok_or_else(|| ShapingError::UnknownField(field.to_string()))
}

/// Canonical names of the requested fields, or `None` when all fields are
/// kept.
fn requested<T: ShapeableResource>(
    fields: Option<&str>,
) -> Result<Option<Vec<&'static str>>, ShapingError> {
    match fields.map(str::trim) {
        None | Some("") => Ok(None),
        Some(list) => list
            .split(',')
            .map(|f| resolve::<T>(f.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

/// Whether every name in `fields` is a property of `T`.
pub fn type_has_properties<T: ShapeableResource>(fields: Option<&str>) -> bool {
    requested::<T>(fields).is_ok()
}

fn to_object<T: ShapeableResource>(resource: &T) -> Result<Map<String, Value>, ShapingError> {
    match serde_json::to_value(resource) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ShapingError::Serialization(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(ShapingError::Serialization(e.to_string())),
    }
}

fn pick(mut full: Map<String, Value>, names: &[&'static str]) -> Map<String, Value> {
    let mut shaped = Map::with_capacity(names.len());
    for name in names {
        if let Some(value) = full.remove(*name) {
            shaped.insert((*name).to_string(), value);
        }
    }
    shaped
}

pub fn shape<T: ShapeableResource>(
    resource: &T,
    fields: Option<&str>,
) -> Result<Map<String, Value>, ShapingError> {
    let names = requested::<T>(fields)?;
    let full = to_object(resource)?;
    Ok(match names {
        None => full,
        Some(names) => pick(full, &names),
    })
}

pub fn shape_all<T: ShapeableResource>(
    resources: &[T],
    fields: Option<&str>,
) -> Result<Vec<Map<String, Value>>, ShapingError> {
    let names = requested::<T>(fields)?;
    resources
        .iter()
        .map(|resource| {
            let full = to_object(resource)?;
            Ok(match &names {
                None => full,
                Some(names) => pick(full, names),
            })
        })
        .collect()
}
