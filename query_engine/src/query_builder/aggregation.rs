use crate::custom_types::CustomTypeRegistry;
use crate::errors::QueryResult;
use crate::query_builder::column::ColumnConfig;
use serde::{Deserialize, Serialize};

/// Represents SQL aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    /// SUM(field)
    Sum,
    /// AVG(field)
    Avg,
    /// MIN(field)
    Min,
    /// MAX(field)
    Max,
}

impl AggregateFunction {
    /// Convert aggregate function to SQL string
    pub fn to_sql(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
        }
    }
}

/// Aggregated output column: `FUNC(column) AS "alias"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub column: ColumnConfig,
    pub alias: String,
    pub function: AggregateFunction,
}

impl Aggregation {
    pub fn new(
        column: impl Into<ColumnConfig>,
        function: AggregateFunction,
        alias: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            alias: alias.into(),
            function,
        }
    }

    pub fn sum(column: impl Into<ColumnConfig>, alias: impl Into<String>) -> Self {
        Self::new(column, AggregateFunction::Sum, alias)
    }

    pub fn avg(column: impl Into<ColumnConfig>, alias: impl Into<String>) -> Self {
        Self::new(column, AggregateFunction::Avg, alias)
    }

    pub fn min(column: impl Into<ColumnConfig>, alias: impl Into<String>) -> Self {
        Self::new(column, AggregateFunction::Min, alias)
    }

    pub fn max(column: impl Into<ColumnConfig>, alias: impl Into<String>) -> Self {
        Self::new(column, AggregateFunction::Max, alias)
    }

    pub fn to_sql(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        Ok(format!(
            "{}({}) AS \"{}\"",
            self.function.to_sql(),
            self.column.aggregation_column(registry)?,
            self.alias
        ))
    }
}
