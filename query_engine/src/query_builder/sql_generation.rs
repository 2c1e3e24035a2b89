//! Query compilation
//!
//! Walks a [`QueryConfig`] and produces one SQL string plus the template
//! parameters naming the datasets it reads from. The physical table name is
//! never known here: FROM clauses hold a `{{.<prefix><dataset>}}` placeholder
//! resolved by a later templating step.

use crate::custom_types::CustomTypeRegistry;
use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::clauses::build_clause;
use crate::query_builder::filter::{FilterCondition, FilterModel, FilterNode};
use crate::query_builder::operators::{
    FilterOperator, ALL_COLUMNS, COLUMN_SEPARATOR, FROM, GROUP_BY, ORDER_BY, SELECT,
    SUBQUERY_ALIAS, WHERE,
};
use crate::query_builder::query_config::QueryConfig;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Template variable name → dataset id
pub type QueryParams = BTreeMap<String, String>;

pub const DEFAULT_PARAM_PREFIX: &str = "zamp_";

/// Knobs bounding what a single compile call accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Prefix of the template variables naming datasets
    pub param_prefix: String,
    /// Deepest filter tree accepted per query level
    pub max_filter_depth: Option<usize>,
    /// Most query levels accepted, counting the outermost one
    pub max_subquery_depth: Option<usize>,
    pub max_page_size: Option<u64>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            param_prefix: DEFAULT_PARAM_PREFIX.to_string(),
            max_filter_depth: None,
            max_subquery_depth: None,
            max_page_size: None,
        }
    }
}

/// Compiles query and filter descriptions into SQL.
///
/// Compilation only reads its input, so one compiler can be shared freely
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    registry: CustomTypeRegistry,
    options: CompilerOptions,
}

static DEFAULT_COMPILER: LazyLock<QueryCompiler> = LazyLock::new(QueryCompiler::default);

/// Compile with the default registry and no limits
pub fn to_sql(config: &QueryConfig) -> QueryResult<(String, QueryParams)> {
    DEFAULT_COMPILER.to_sql(config)
}

/// Compile a standalone filter with the default registry and no limits
pub fn to_filter_sql(filters: &FilterModel) -> QueryResult<(String, QueryParams)> {
    DEFAULT_COMPILER.to_filter_sql(filters)
}

impl QueryCompiler {
    pub fn new(registry: CustomTypeRegistry, options: CompilerOptions) -> Self {
        Self { registry, options }
    }

    pub fn with_registry(mut self, registry: CustomTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &CustomTypeRegistry {
        &self.registry
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a full query. On error nothing usable is returned.
    pub fn to_sql(&self, config: &QueryConfig) -> QueryResult<(String, QueryParams)> {
        if let Some(max) = self.options.max_subquery_depth {
            let depth = config.nesting_depth();
            if depth > max {
                return Err(QueryBuilderError::LimitExceeded(format!(
                    "query nests {} levels, at most {} allowed",
                    depth, max
                )));
            }
        }

        let mut params = QueryParams::new();
        let sql = self.build_select_query(config, &mut params)?;
        debug_log!(
            "compiled query for dataset '{}' ({} params)",
            config.table_config.dataset_id,
            params.len()
        );
        trace_log!("compiled SQL: {}", sql);
        Ok((sql, params))
    }

    /// Compile a filter tree on its own, e.g. to compute facet options.
    /// The parameter map is always empty.
    pub fn to_filter_sql(&self, filters: &FilterModel) -> QueryResult<(String, QueryParams)> {
        let sql = self.build_filter_model(filters)?;
        trace_log!("compiled filter SQL: {}", sql);
        Ok((sql, QueryParams::new()))
    }

    fn build_select_query(&self, config: &QueryConfig, params: &mut QueryParams) -> QueryResult<String> {
        let from = self.build_from_clause(config, params)?;
        let columns = self.build_select_list(config)?;

        let mut sql = format!("{}{}{}{}", SELECT, columns.join(COLUMN_SEPARATOR), FROM, from);

        if !config.filters.is_empty() {
            sql.push_str(WHERE);
            sql.push_str(&self.build_filter_model(&config.filters)?);
        }

        if !config.group_by.is_empty() {
            let group_columns = config
                .group_by
                .iter()
                .map(|g| g.clause_sql(&self.registry))
                .collect::<QueryResult<Vec<_>>>()?;
            sql.push_str(GROUP_BY);
            sql.push_str(&group_columns.join(COLUMN_SEPARATOR));
        }

        if !config.order_by.is_empty() {
            let orders: Vec<String> = config.order_by.iter().map(|o| o.to_sql()).collect();
            sql.push_str(ORDER_BY);
            sql.push_str(&orders.join(COLUMN_SEPARATOR));
        }

        if let Some(pagination) = &config.pagination {
            if let Some(max) = self.options.max_page_size {
                if pagination.page_size > max {
                    return Err(QueryBuilderError::LimitExceeded(format!(
                        "page size {} is above the maximum of {}",
                        pagination.page_size, max
                    )));
                }
            }
            sql.push_str(&pagination.to_sql()?);
        }

        Ok(sql)
    }

    /// The inner query when there is one, otherwise the dataset placeholder
    fn build_from_clause(&self, config: &QueryConfig, params: &mut QueryParams) -> QueryResult<String> {
        match &config.subquery {
            Some(inner) => {
                let inner_sql = self.build_select_query(inner, params)?;
                Ok(format!("( {} ) {}", inner_sql, SUBQUERY_ALIAS))
            }
            None => {
                let dataset_id = &config.table_config.dataset_id;
                let key = format!("{}{}", self.options.param_prefix, dataset_id);
                let placeholder = format!("{{{{.{}}}}}", key);
                params.insert(key, dataset_id.clone());
                Ok(placeholder)
            }
        }
    }

    /// Each stage that applies replaces what the previous ones built, except windows which append
    fn build_select_list(&self, config: &QueryConfig) -> QueryResult<Vec<String>> {
        let mut columns = config
            .table_config
            .columns
            .iter()
            .map(|c| c.select_column(&self.registry))
            .collect::<QueryResult<Vec<_>>>()?;

        columns.extend(config.windows.iter().map(|w| w.to_sql()));

        if !config.group_by.is_empty() {
            columns = config
                .group_by
                .iter()
                .map(|g| g.select_sql(&self.registry))
                .collect::<QueryResult<Vec<_>>>()?;
        }

        if !config.aggregations.is_empty() {
            if config.group_by.is_empty() {
                columns.clear();
            }
            for aggregation in &config.aggregations {
                columns.push(aggregation.to_sql(&self.registry)?);
            }
        }

        if columns.is_empty() {
            columns.push(ALL_COLUMNS.to_string());
        }

        Ok(columns)
    }

    pub(crate) fn build_filter_model(&self, model: &FilterModel) -> QueryResult<String> {
        if let Some(max) = self.options.max_filter_depth {
            let depth = model.depth();
            if depth > max {
                return Err(QueryBuilderError::LimitExceeded(format!(
                    "filter nests {} levels, at most {} allowed",
                    depth, max
                )));
            }
        }

        let separator = match (model.logical_operator, model.conditions.len()) {
            (Some(op), _) => op.separator(),
            (None, 0 | 1) => "",
            (None, n) => {
                return Err(QueryBuilderError::InvalidDataType(format!(
                    "{} top-level conditions need a logical operator",
                    n
                )))
            }
        };

        let parts = model
            .conditions
            .iter()
            .map(|c| self.build_condition(c))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(parts.join(separator))
    }

    fn build_condition(&self, node: &FilterNode) -> QueryResult<String> {
        match node {
            FilterNode::Leaf(condition) => self.build_leaf(condition),
            FilterNode::Group {
                logical_operator,
                conditions,
            } => {
                if conditions.is_empty() {
                    return Err(QueryBuilderError::NoConditions);
                }
                let parts = conditions
                    .iter()
                    .map(|c| self.build_condition(c))
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(format!("({})", parts.join(logical_operator.separator())))
            }
        }
    }

    fn build_leaf(&self, condition: &FilterCondition) -> QueryResult<String> {
        let operator: FilterOperator = condition.operator.parse()?;
        let column = condition.column.filter_column(&self.registry)?;
        let datatype = condition.column.datatype.ok_or_else(|| {
            QueryBuilderError::InvalidDataType(format!(
                "column '{}' needs a datatype to be filtered",
                condition.column.column
            ))
        })?;
        let value = condition.value.to_sql_value()?;
        build_clause(&column, datatype, operator, &value)
    }
}
