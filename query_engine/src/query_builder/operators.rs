//! Operator and keyword tables
//!
//! Fixed mappings from abstract filter operators to SQL tokens. These are
//! plain `match` tables, so they are immutable and shared by every caller.

use crate::errors::QueryBuilderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SELECT: &str = "SELECT ";
pub const FROM: &str = " FROM ";
pub const WHERE: &str = " WHERE ";
pub const GROUP_BY: &str = " GROUP BY ";
pub const ORDER_BY: &str = " ORDER BY ";
pub const LIMIT: &str = " LIMIT ";
pub const OFFSET: &str = " OFFSET ";
pub const ALL_COLUMNS: &str = "*";
pub const COLUMN_SEPARATOR: &str = ", ";
pub const SUBQUERY_ALIAS: &str = "subquery";

/// Abstract filter operator as it arrives from clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    NotContains,
    In,
    NotIn,
    StartsWith,
    EndsWith,
    StartsWithCaseSensitive,
    InBetween,
    IsNull,
    And,
    Or,
    ArrayContains,
    ArrayIn,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 19] = [
        FilterOperator::Eq,
        FilterOperator::Neq,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::In,
        FilterOperator::NotIn,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::StartsWithCaseSensitive,
        FilterOperator::InBetween,
        FilterOperator::IsNull,
        FilterOperator::And,
        FilterOperator::Or,
        FilterOperator::ArrayContains,
        FilterOperator::ArrayIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Neq => "neq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "ncontains",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "nin",
            FilterOperator::StartsWith => "startswith",
            FilterOperator::EndsWith => "endswith",
            FilterOperator::StartsWithCaseSensitive => "startswith_cs",
            FilterOperator::InBetween => "inbetween",
            FilterOperator::IsNull => "is_null",
            FilterOperator::And => "and",
            FilterOperator::Or => "or",
            FilterOperator::ArrayContains => "array_contains",
            FilterOperator::ArrayIn => "array_in",
        }
    }

    /// SQL token this operator renders to. Several operators share `LIKE`;
    /// wildcard placement is the clause builder's job.
    pub fn sql_token(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Neq => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Contains => "LIKE",
            FilterOperator::NotContains => "NOT LIKE",
            FilterOperator::In => "IN",
            FilterOperator::NotIn => "NOT IN",
            FilterOperator::StartsWith => "LIKE",
            FilterOperator::EndsWith => "LIKE",
            FilterOperator::StartsWithCaseSensitive => "LIKE",
            FilterOperator::InBetween => "BETWEEN",
            FilterOperator::IsNull => "IS NULL",
            FilterOperator::And => "AND",
            FilterOperator::Or => "OR",
            FilterOperator::ArrayContains => "LIKE",
            FilterOperator::ArrayIn => "=",
        }
    }

    pub fn is_array_operator(&self) -> bool {
        matches!(self, FilterOperator::ArrayContains | FilterOperator::ArrayIn)
    }
}

impl FromStr for FilterOperator {
    type Err = QueryBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOperator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryBuilderError::InvalidOperator(s.to_string()))
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FilterOperator> for String {
    fn from(op: FilterOperator) -> Self {
        op.as_str().to_string()
    }
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }

    /// Separator placed between sibling conditions
    pub fn separator(&self) -> &'static str {
        match self {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        }
    }
}

impl FromStr for LogicalOperator {
    type Err = QueryBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(LogicalOperator::And),
            "OR" => Ok(LogicalOperator::Or),
            other => Err(QueryBuilderError::InvalidDataType(format!(
                "invalid logical operator '{}', expected AND or OR",
                other
            ))),
        }
    }
}

impl TryFrom<String> for LogicalOperator {
    type Error = QueryBuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LogicalOperator> for String {
    fn from(op: LogicalOperator) -> Self {
        op.to_sql().to_string()
    }
}
