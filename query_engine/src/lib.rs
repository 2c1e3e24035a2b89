//! Query Engine - declarative analytics queries compiled to SQL
//!
//! This crate provides the query model (columns, filter trees, aggregations,
//! grouping, ordering, windows, pagination, subqueries), the operator tables
//! and clause builders, custom column types, and the compiler producing a SQL
//! string plus the dataset template parameters it references.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod custom_types;
pub mod errors;
pub mod prelude;
pub mod query_builder;

pub use custom_types::{CustomDataConfig, CustomDataType, CustomTypeRegistry};
pub use errors::{QueryBuilderError, QueryResult};
pub use query_builder::{to_filter_sql, to_sql, QueryCompiler, QueryConfig, QueryParams};
pub use type_mapping::{Datatype, FilterValue};
