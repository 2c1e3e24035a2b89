//! Convenience re-exports for building and compiling queries

pub use crate::custom_types::{
    AmountConfig, AmountType, CustomDataConfig, CustomDataType, CustomTypeRegistry, AMOUNT_TYPE,
};
pub use crate::errors::{QueryBuilderError, QueryResult};
pub use crate::query_builder::{
    to_filter_sql, to_sql, AggregateFunction, Aggregation, ColumnConfig, CompilerOptions,
    FilterModel, FilterNode, FilterOperator, GroupBy, LogicalOperator, OrderBy, Pagination,
    QueryCompiler, QueryConfig, QueryParams, SortOrder, TableConfig, WindowConfig, WindowFunction,
};
pub use type_mapping::{Datatype, FilterValue};
