//! Translation of DTO property names in `orderBy` into stored fields.
//!
//! `orderBy` is a comma-separated list of `property [desc]` clauses. Each
//! property maps to one or more destination fields; a reverted mapping
//! flips the direction (sorting by `Age` ascending means sorting by date of
//! birth descending).

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::AuthorField;
use crate::shared::{SortClause, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyMappingError {
    #[error("Cannot sort by '{0}': no such property")]
    UnknownProperty(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMappingValue<F> {
    pub destinations: Vec<F>,
    pub revert: bool,
}

/// Case-insensitive map from a DTO property to its destination fields.
#[derive(Debug, Clone)]
pub struct PropertyMapping<F> {
    entries: HashMap<String, PropertyMappingValue<F>>,
}

impl<F: Copy> Default for PropertyMapping<F> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<F: Copy> PropertyMapping<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, property: &str, destinations: &[F], revert: bool) -> Self {
        self.entries.insert(
            property.to_lowercase(),
            PropertyMappingValue {
                destinations: destinations.to_vec(),
                revert,
            },
        );
        self
    }

    pub fn get(&self, property: &str) -> Option<&PropertyMappingValue<F>> {
        self.entries.get(&property.to_lowercase())
    }

    pub fn valid_mapping_exists_for(&self, order_by: &str) -> bool {
        self.sort_clauses(order_by).is_ok()
    }

    /// Expand `order_by` into ordered sort clauses. A blank string yields
    /// no clauses; a blank or unknown clause is an error.
    pub fn sort_clauses(&self, order_by: &str) -> Result<Vec<SortClause<F>>, PropertyMappingError> {
        if order_by.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut clauses = Vec::new();
        for raw in order_by.split(',') {
            let clause = raw.trim();
            let property = clause.split(' ').next().unwrap_or_default();
            let descending = clause.to_lowercase().ends_with(" desc");

            let mapping = self
                .get(property)
                .ok_or_else(|| PropertyMappingError::UnknownProperty(property.to_string()))?;

            let mut direction = if descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            if mapping.revert {
                direction = direction.reversed();
            }

            clauses.extend(
                mapping
                    .destinations
                    .iter()
                    .map(|field| SortClause::new(*field, direction)),
            );
        }

        Ok(clauses)
    }
}

/// Registry of the property mappings of every sortable resource.
#[derive(Debug, Clone)]
pub struct PropertyMappingService {
    authors: PropertyMapping<AuthorField>,
}

impl Default for PropertyMappingService {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyMappingService {
    pub fn new() -> Self {
        let authors = PropertyMapping::new()
            .map("Id", &[AuthorField::Id], false)
            .map("Genre", &[AuthorField::Genre], false)
            .map("Age", &[AuthorField::DateOfBirth], true)
            .map("Name", &[AuthorField::FirstName, AuthorField::LastName], false);

        Self { authors }
    }

    pub fn authors(&self) -> &PropertyMapping<AuthorField> {
        &self.authors
    }
}
