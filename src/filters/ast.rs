/// Message fields a filter term can address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    /// Sender id (exact match)
    Sender,
    /// Sender display name (case-insensitive substring)
    Name,
    /// Message type, by label or raw integer code
    Type,
    /// Prefix of the local `YYYY-MM-DD` date
    Date,
    /// Messages on or after a local date (YYYY-MM-DD)
    Since,
    /// Case-insensitive substring of the content
    Keyword,
}

/// Logical operators for combining filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOperator {
    /// Both conditions must match (default between different fields)
    And,
    /// Either condition matches (default within same field)
    Or,
}

/// Single field:value filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: FilterField,
    pub value: String,
}

impl FieldFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

/// Filter expression combining multiple field filters with operators
///
/// There is no grouping; terms are folded left to right.
/// - Same-field filters are OR'd together: sender:u1 sender:u2 → (u1 OR u2)
/// - Cross-field filters are AND'd together: sender:u1 type:image → (u1 AND image)
/// - Explicit operators override defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpr {
    pub filters: Vec<FieldFilter>,
    pub operators: Vec<FilterOperator>,
}

impl FilterExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, filter: FieldFilter) {
        self.filters.push(filter);
    }

    pub fn add_operator(&mut self, operator: FilterOperator) {
        self.operators.push(operator);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
