//! # SheetQuery
//!
//! Compiles declarative sheet queries and filter trees into SQL whose datasets
//! are left as template placeholders for a later substitution step.
//!
//! ## Quick Start
//!
//! ```rust
//! use sheetquery::prelude::*;
//!
//! let service = QueryService::new(&AppConfig::default());
//!
//! let query = QueryConfig::new(TableConfig::new("orders").with_columns(["id", "status"]))
//!     .with_filters(FilterModel::single(FilterNode::eq(
//!         ColumnConfig::typed("status", Datatype::String),
//!         "shipped",
//!     )))
//!     .with_pagination(1, 25);
//!
//! let (sql, params) = service.to_sql(&query)?;
//! assert_eq!(
//!     sql,
//!     "SELECT id, status FROM {{.zamp_orders}} WHERE ( status = 'shipped' ) LIMIT 25 OFFSET 0"
//! );
//! assert_eq!(params["zamp_orders"], "orders");
//! # Ok::<(), SheetQueryError>(())
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::{FilterOptionsRequest, QueryService};
pub use errors::SheetQueryError;

// Re-export centralized config
pub use config::{AppConfig, QuerySettings};

// Re-export internal crates used by the public API
pub use query_engine;
pub use type_mapping;
