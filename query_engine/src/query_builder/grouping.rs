use crate::custom_types::CustomTypeRegistry;
use crate::errors::QueryResult;
use crate::query_builder::column::ColumnConfig;
use serde::{Deserialize, Serialize};

/// One GROUP BY entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBy {
    pub column: ColumnConfig,
}

impl GroupBy {
    pub fn new(column: impl Into<ColumnConfig>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// Projection this entry contributes to the SELECT list
    pub fn select_sql(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        self.column.group_by_select_column(registry)
    }

    /// Expression this entry contributes to the GROUP BY clause
    pub fn clause_sql(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        self.column.group_by_column(registry)
    }
}
