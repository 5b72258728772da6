/// Direction of a single ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Order by `field` in `direction`. Clauses earlier in a list take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortClause<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F> SortClause<F> {
    pub fn new(field: F, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
