use crate::query_builder::column::ColumnConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One ORDER BY entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: ColumnConfig,
    #[serde(default)]
    pub order: SortOrder,
}

impl OrderBy {
    pub fn new(column: impl Into<ColumnConfig>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    pub fn asc(column: impl Into<ColumnConfig>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: impl Into<ColumnConfig>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column.order_by_column(), self.order.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_sql() {
        assert_eq!(OrderBy::asc("_time_stamp_utc").to_sql(), "_time_stamp_utc ASC");
        assert_eq!(
            OrderBy::desc(ColumnConfig::new("SUM(x)").with_alias("total")).to_sql(),
            "\"total\" DESC"
        );
    }

    #[test]
    fn test_order_defaults_to_ascending() {
        let order: OrderBy = serde_json::from_str(r#"{"column":{"column":"id"}}"#).unwrap();
        assert_eq!(order.order, SortOrder::Asc);
    }
}
