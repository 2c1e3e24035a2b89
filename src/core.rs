//! Core SheetQuery functionality
//!
//! This module contains the main QueryService and its implementation, wiring
//! the loaded configuration into a shared compiler and layering the facet
//! options and row count queries on top of it.

use serde::{Deserialize, Serialize};

use crate::errors::SheetQueryError;
use config::AppConfig;
use query_engine::query_builder::operators::{FROM, SELECT, SUBQUERY_ALIAS};
use query_engine::query_builder::{
    ColumnConfig, CompilerOptions, FilterModel, GroupBy, OrderBy, Pagination, TableConfig,
};
use query_engine::{CustomTypeRegistry, QueryCompiler, QueryConfig, QueryParams};

/// Column name of the single value returned by a count query
pub const COUNT_ALIAS: &str = "count";

/// Everything needed to list the distinct values of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptionsRequest {
    pub dataset_id: String,
    pub column: ColumnConfig,
    #[serde(default)]
    pub filters: FilterModel,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl FilterOptionsRequest {
    pub fn new(dataset_id: impl Into<String>, column: impl Into<ColumnConfig>) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            column: column.into(),
            filters: FilterModel::default(),
            limit: None,
        }
    }

    pub fn with_filters(mut self, filters: FilterModel) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, SheetQueryError> {
        serde_json::from_str(json).map_err(|e| SheetQueryError::MalformedRequest(e.to_string()))
    }
}

/// Main entry point holding one compiler configured from [`AppConfig`]
#[derive(Debug, Clone, Default)]
pub struct QueryService {
    compiler: QueryCompiler,
}

impl QueryService {
    /// Create a service from an already validated configuration
    pub fn new(config: &AppConfig) -> Self {
        let options = CompilerOptions {
            param_prefix: config.query.param_prefix.clone(),
            max_filter_depth: config.query.max_filter_depth,
            max_subquery_depth: config.query.max_subquery_depth,
            max_page_size: config.query.max_page_size,
        };
        Self {
            compiler: QueryCompiler::default().with_options(options),
        }
    }

    /// Validate the configuration, then create the service
    pub fn from_config(config: &AppConfig) -> Result<Self, SheetQueryError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a service from `sheetquery.toml` or the file named by `SHEETQUERY_CONFIG`
    pub fn load() -> Result<Self, SheetQueryError> {
        let config = AppConfig::load()?;
        tracing::debug!(
            param_prefix = %config.query.param_prefix,
            "loaded query configuration"
        );
        Ok(Self::new(&config))
    }

    /// Replace the custom type registry, e.g. to add strategies besides `amount`
    pub fn with_registry(mut self, registry: CustomTypeRegistry) -> Self {
        self.compiler = self.compiler.with_registry(registry);
        self
    }

    pub fn compiler(&self) -> &QueryCompiler {
        &self.compiler
    }

    /// Compile a full query
    pub fn to_sql(&self, config: &QueryConfig) -> Result<(String, QueryParams), SheetQueryError> {
        let dataset = config.table_config.dataset_id.as_str();
        match self.compiler.to_sql(config) {
            Ok((sql, params)) => {
                tracing::debug!(dataset, sql_len = sql.len(), "compiled query");
                Ok((sql, params))
            }
            Err(e) => {
                tracing::warn!(dataset, error = %e, "rejected query");
                Err(e.into())
            }
        }
    }

    /// Compile a standalone filter tree
    pub fn to_filter_sql(
        &self,
        filters: &FilterModel,
    ) -> Result<(String, QueryParams), SheetQueryError> {
        match self.compiler.to_filter_sql(filters) {
            Ok((sql, params)) => {
                tracing::debug!(sql_len = sql.len(), "compiled filter");
                Ok((sql, params))
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected filter");
                Err(e.into())
            }
        }
    }

    /// Distinct values of a column under the given filters, used to populate a
    /// sheet filter's option list. Array columns contribute one row per element.
    pub fn filter_options_sql(
        &self,
        request: &FilterOptionsRequest,
    ) -> Result<(String, QueryParams), SheetQueryError> {
        let mut column = request.column.clone();
        if column.alias.is_none() {
            column.alias = Some(column.column.clone());
        }

        let mut config = QueryConfig::new(TableConfig::new(request.dataset_id.clone()))
            .with_filters(request.filters.clone())
            .with_group_by(GroupBy::new(column.clone()))
            .with_order_by(OrderBy::asc(column));
        config.pagination = request.limit.map(|limit| Pagination::new(1, limit));

        tracing::debug!(
            dataset = %request.dataset_id,
            column = %request.column.column,
            "building filter options query"
        );
        self.to_sql(&config)
    }

    /// Total row count of a query, ignoring its ordering and pagination.
    /// The query must ask for it through `countAll`.
    pub fn count_sql(&self, config: &QueryConfig) -> Result<(String, QueryParams), SheetQueryError> {
        if !config.count_all {
            tracing::warn!(
                dataset = %config.table_config.dataset_id,
                "count requested without countAll"
            );
            return Err(SheetQueryError::CountNotRequested(
                config.table_config.dataset_id.clone(),
            ));
        }

        let mut inner = config.clone();
        inner.order_by.clear();
        inner.pagination = None;

        let (inner_sql, params) = self.to_sql(&inner)?;
        let sql = format!(
            "{}COUNT(*) AS \"{}\"{}( {} ) {}",
            SELECT, COUNT_ALIAS, FROM, inner_sql, SUBQUERY_ALIAS
        );
        Ok((sql, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::QuerySettings;
    use query_engine::prelude::{Aggregation, Datatype, FilterNode, QueryBuilderError};

    fn limited_service() -> QueryService {
        QueryService::new(&AppConfig {
            query: QuerySettings::new("ds_".to_string(), Some(2), Some(2), Some(100)),
        })
    }

    #[test]
    fn test_default_service_uses_default_prefix() {
        let service = QueryService::default();
        let (sql, params) = service
            .to_sql(&QueryConfig::new(TableConfig::new("orders")))
            .unwrap();
        assert_eq!(sql, "SELECT * FROM {{.zamp_orders}}");
        assert_eq!(params["zamp_orders"], "orders");
    }

    #[test]
    fn test_config_flows_into_compiler() {
        let service = limited_service();
        let options = service.compiler().options();
        assert_eq!(options.param_prefix, "ds_");
        assert_eq!(options.max_page_size, Some(100));

        let (sql, _) = service
            .to_sql(&QueryConfig::new(TableConfig::new("orders")))
            .unwrap();
        assert_eq!(sql, "SELECT * FROM {{.ds_orders}}");

        let too_big = QueryConfig::new(TableConfig::new("orders")).with_pagination(1, 500);
        assert!(matches!(
            service.to_sql(&too_big),
            Err(SheetQueryError::Query(QueryBuilderError::LimitExceeded(_)))
        ));
    }

    #[test]
    fn test_from_config_validates() {
        let config = AppConfig {
            query: QuerySettings::new(String::new(), None, None, None),
        };
        assert!(matches!(
            QueryService::from_config(&config),
            Err(SheetQueryError::Config(_))
        ));
    }

    #[test]
    fn test_filter_options_scalar_column() {
        let request = FilterOptionsRequest::new(
            "orders",
            ColumnConfig::typed("status", Datatype::String),
        )
        .with_filters(FilterModel::single(FilterNode::gt(
            ColumnConfig::typed("total", Datatype::Integer),
            10,
        )))
        .with_limit(20);

        let (sql, params) = QueryService::default().filter_options_sql(&request).unwrap();
        assert_eq!(
            sql,
            "SELECT status AS \"status\" FROM {{.zamp_orders}} WHERE ( total > 10 ) \
             GROUP BY \"status\" ORDER BY \"status\" ASC LIMIT 20 OFFSET 0"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_filter_options_array_column_unnests() {
        let request = FilterOptionsRequest::new(
            "orders",
            ColumnConfig::typed("tags", Datatype::ArrayOfString),
        );
        let (sql, _) = QueryService::default().filter_options_sql(&request).unwrap();
        assert_eq!(
            sql,
            "SELECT unnest(tags) AS \"tags\" FROM {{.zamp_orders}} GROUP BY \"tags\" ORDER BY \"tags\" ASC"
        );
    }

    #[test]
    fn test_filter_options_keeps_declared_alias() {
        let request = FilterOptionsRequest::new(
            "orders",
            ColumnConfig::typed("region_code", Datatype::String).with_alias("region"),
        );
        let (sql, _) = QueryService::default().filter_options_sql(&request).unwrap();
        assert!(sql.starts_with("SELECT region_code AS \"region\" FROM"));
        assert!(sql.ends_with("GROUP BY \"region\" ORDER BY \"region\" ASC"));
    }

    #[test]
    fn test_filter_options_requires_datatype() {
        let request = FilterOptionsRequest::new("orders", "status");
        assert!(matches!(
            QueryService::default().filter_options_sql(&request),
            Err(SheetQueryError::Query(QueryBuilderError::InvalidDataType(_)))
        ));
    }

    #[test]
    fn test_count_strips_order_and_pagination() {
        let config = QueryConfig::new(TableConfig::new("orders").with_columns(["id"]))
            .with_filters(FilterModel::single(FilterNode::eq(
                ColumnConfig::typed("status", Datatype::String),
                "open",
            )))
            .with_order_by(OrderBy::desc("id"))
            .with_pagination(3, 10)
            .with_count_all(true);

        let (sql, params) = QueryService::default().count_sql(&config).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS \"count\" FROM ( SELECT id FROM {{.zamp_orders}} WHERE ( status = 'open' ) ) subquery"
        );
        assert_eq!(params["zamp_orders"], "orders");
    }

    #[test]
    fn test_count_of_grouped_query() {
        let config = QueryConfig::new(TableConfig::new("sales"))
            .with_group_by(GroupBy::new(ColumnConfig::typed("country", Datatype::String)))
            .with_aggregation(Aggregation::sum("price", "revenue"))
            .with_count_all(true);
        let (sql, _) = QueryService::default().count_sql(&config).unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) AS \"count\" FROM ( SELECT country, SUM(price) AS \"revenue\" FROM {{.zamp_sales}} GROUP BY country ) subquery"
        );
    }

    #[test]
    fn test_count_requires_count_all() {
        let config = QueryConfig::new(TableConfig::new("orders"));
        assert!(matches!(
            QueryService::default().count_sql(&config),
            Err(SheetQueryError::CountNotRequested(dataset)) if dataset == "orders"
        ));
    }

    #[test]
    fn test_filter_sql_passthrough() {
        let filters = FilterModel::single(FilterNode::is_null(ColumnConfig::typed(
            "memo",
            Datatype::String,
        )));
        let (sql, params) = limited_service().to_filter_sql(&filters).unwrap();
        assert_eq!(sql, "( memo IS NULL )");
        assert!(params.is_empty());
    }

    #[test]
    fn test_request_from_json() {
        let request = FilterOptionsRequest::from_json(
            r#"{"datasetId": "orders", "column": {"column": "status", "datatype": "string"}, "limit": 5}"#,
        )
        .unwrap();
        assert_eq!(request.dataset_id, "orders");
        assert_eq!(request.limit, Some(5));
        assert!(request.filters.is_empty());

        assert!(matches!(
            FilterOptionsRequest::from_json("{}"),
            Err(SheetQueryError::MalformedRequest(_))
        ));
    }
}
