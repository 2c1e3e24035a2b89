//! Query builder
//!
//! Declarative query model plus the compiler turning it into SQL.

pub mod aggregation;
pub mod clauses;
pub mod column;
pub mod filter;
pub mod grouping;
pub mod operators;
pub mod ordering;
pub mod pagination;
pub mod query_config;
pub mod sql_generation;
pub mod window;



pub use aggregation::{AggregateFunction, Aggregation};
pub use column::ColumnConfig;
pub use filter::{FilterCondition, FilterModel, FilterNode};
pub use grouping::GroupBy;
pub use operators::{FilterOperator, LogicalOperator};
pub use ordering::{OrderBy, SortOrder};
pub use pagination::Pagination;
pub use query_config::{QueryConfig, TableConfig};
pub use sql_generation::{to_filter_sql, to_sql, CompilerOptions, QueryCompiler, QueryParams};
pub use window::{WindowConfig, WindowFunction};
