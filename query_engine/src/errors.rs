use thiserror::Error;
use type_mapping::ValueError;

pub type QueryResult<T> = Result<T, QueryBuilderError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryBuilderError {
    #[error("Invalid data type: {0}")]
    InvalidDataType(String),

    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Invalid custom data type: {0}")]
    InvalidCustomDataType(String),

    #[error("Invalid custom data type config: {0}")]
    InvalidCustomDataTypeConfig(String),

    #[error("No conditions provided")]
    NoConditions,

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

impl From<ValueError> for QueryBuilderError {
    fn from(err: ValueError) -> Self {
        QueryBuilderError::InvalidDataType(err.to_string())
    }
}
