//! Unified type mapping between filter values and SQL literals
//! This crate provides the value and datatype vocabulary shared across the sheetquery workspace

pub mod serialize;
pub mod sql;
pub mod types;

pub use sql::{strip_quotes, SqlValue, ValueError};
pub use types::{Datatype, FilterValue};
