use crate::query_builder::column::ColumnConfig;
use crate::query_builder::ordering::OrderBy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowFunction {
    RowNumber,
}

impl WindowFunction {
    pub fn to_sql(&self) -> &'static str {
        match self {
            WindowFunction::RowNumber => "ROW_NUMBER",
        }
    }
}

/// Window function projection appended to the SELECT list of one query level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowConfig {
    pub function: WindowFunction,
    #[serde(default)]
    pub partition_by: Vec<ColumnConfig>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    pub alias: String,
}

impl WindowConfig {
    pub fn row_number(alias: impl Into<String>) -> Self {
        Self {
            function: WindowFunction::RowNumber,
            partition_by: Vec::new(),
            order_by: Vec::new(),
            alias: alias.into(),
        }
    }

    pub fn partition_by(mut self, column: impl Into<ColumnConfig>) -> Self {
        self.partition_by.push(column.into());
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Window clauses cannot see aliases of the same level, so raw columns are used
    pub fn to_sql(&self) -> String {
        let mut clause = String::new();
        if !self.partition_by.is_empty() {
            let columns: Vec<&str> = self.partition_by.iter().map(|c| c.column.as_str()).collect();
            clause.push_str(" PARTITION BY ");
            clause.push_str(&columns.join(", "));
        }
        if !self.order_by.is_empty() {
            let orders: Vec<String> = self
                .order_by
                .iter()
                .map(|o| format!("{} {}", o.column.column, o.order.to_sql()))
                .collect();
            clause.push_str(" ORDER BY ");
            clause.push_str(&orders.join(", "));
        }

        format!(
            "{}() OVER ( {} ) AS \"{}\"",
            self.function.to_sql(),
            clause,
            self.alias
        )
    }
}
