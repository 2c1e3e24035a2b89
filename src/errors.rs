//! Error types for the SheetQuery crate
//!
//! This module contains all error types that can be returned by SheetQuery operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetQueryError {
    #[error("Query compilation error: {0}")]
    Query(#[from] query_engine::QueryBuilderError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Count requested for dataset '{0}' without countAll")]
    CountNotRequested(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}
