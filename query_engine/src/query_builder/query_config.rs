//! Declarative description of one query

use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::aggregation::Aggregation;
use crate::query_builder::column::ColumnConfig;
use crate::query_builder::filter::FilterModel;
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::ordering::OrderBy;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::window::WindowConfig;
use serde::{Deserialize, Serialize};

/// Dataset reference plus the columns to project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Opaque dataset key, resolved to a physical table by a later templating step
    pub dataset_id: String,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn new(dataset_id: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_columns<I, C>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnConfig>,
    {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }
}

/// Root descriptor of one query.
///
/// When `subquery` is set the FROM clause wraps the compiled inner query and
/// `table_config.dataset_id` is ignored; `table_config.columns` still feed the
/// outer SELECT list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryConfig {
    pub table_config: TableConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subquery: Option<Box<QueryConfig>>,
    pub windows: Vec<WindowConfig>,
    pub filters: FilterModel,
    pub aggregations: Vec<Aggregation>,
    pub group_by: Vec<GroupBy>,
    pub order_by: Vec<OrderBy>,
    pub count_all: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl QueryConfig {
    pub fn new(table_config: TableConfig) -> Self {
        Self {
            table_config,
            ..Default::default()
        }
    }

    pub fn with_subquery(mut self, subquery: QueryConfig) -> Self {
        self.subquery = Some(Box::new(subquery));
        self
    }

    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.windows.push(window);
        self
    }

    pub fn with_filters(mut self, filters: FilterModel) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregations.push(aggregation);
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by.push(group_by);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    pub fn with_pagination(mut self, page: u64, page_size: u64) -> Self {
        self.pagination = Some(Pagination::new(page, page_size));
        self
    }

    pub fn with_count_all(mut self, count_all: bool) -> Self {
        self.count_all = count_all;
        self
    }

    /// Number of query levels, counting this one
    pub fn nesting_depth(&self) -> usize {
        1 + self.subquery.as_ref().map_or(0, |inner| inner.nesting_depth())
    }

    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json).map_err(|e| QueryBuilderError::InvalidDataType(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::aggregation::AggregateFunction;

    #[test]
    fn test_decode_full_config() {
        let config = QueryConfig::from_json(
            r#"{
                "tableConfig": {"datasetId": "sales", "columns": [{"column": "region"}]},
                "aggregations": [{"column": {"column": "revenue"}, "alias": "total", "function": "SUM"}],
                "groupBy": [{"column": {"column": "region", "datatype": "string"}}],
                "orderBy": [{"column": {"column": "region"}, "order": "DESC"}],
                "pagination": {"page": 2, "pageSize": 25},
                "countAll": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.table_config.dataset_id, "sales");
        assert_eq!(config.aggregations[0].function, AggregateFunction::Sum);
        assert_eq!(config.pagination, Some(Pagination::new(2, 25)));
        assert!(config.count_all);
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_decode_rejects_bad_payload() {
        assert!(matches!(
            QueryConfig::from_json(r#"{"pagination": {"page": "one"}}"#),
            Err(QueryBuilderError::InvalidDataType(_))
        ));
    }

    #[test]
    fn test_nesting_depth() {
        let inner = QueryConfig::new(TableConfig::new("a"));
        let outer = QueryConfig::new(TableConfig::new("b")).with_subquery(inner.clone().with_subquery(inner));
        assert_eq!(outer.nesting_depth(), 3);
    }
}
