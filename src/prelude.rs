//! Convenience re-exports for common SheetQuery usage
//!
//! This prelude module re-exports the most commonly used items from the SheetQuery workspace,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use sheetquery::prelude::*;
//!
//! let service = QueryService::default();
//! let (sql, _) = service.to_sql(&QueryConfig::new(TableConfig::new("orders")))?;
//! assert_eq!(sql, "SELECT * FROM {{.zamp_orders}}");
//! # Ok::<(), SheetQueryError>(())
//! ```

// Core SheetQuery components
pub use crate::core::{FilterOptionsRequest, QueryService, COUNT_ALIAS};
pub use crate::errors::SheetQueryError;

// Re-export centralized config
pub use config::{AppConfig, QuerySettings};

// Query model, compiler and custom types
pub use query_engine::prelude::*;
