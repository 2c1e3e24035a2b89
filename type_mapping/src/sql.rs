//! SQL literal conversion
//!
//! This module handles conversion of filter values into the literal text
//! spliced into generated SQL.

use crate::types::FilterValue;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("value of kind '{0}' has no SQL literal form")]
    Unsupported(&'static str),
}

/// A filter value after literal conversion
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Literal(String),
    List(Vec<SqlValue>),
}

impl SqlValue {
    /// The literal text, if this is a scalar
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            SqlValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// The element literals, if this is a list made only of scalars
    pub fn as_literals(&self) -> Option<Vec<&str>> {
        match self {
            SqlValue::List(items) => items.iter().map(SqlValue::as_literal).collect(),
            _ => None,
        }
    }
}

impl FilterValue {
    /// Convert to SQL literal text.
    ///
    /// Strings are wrapped in single quotes without escaping, so callers must
    /// not pass untrusted text expecting it to be sanitized.
    pub fn to_sql_value(&self) -> Result<SqlValue, ValueError> {
        let value = match self {
            FilterValue::Null => SqlValue::Null,
            FilterValue::Bool(b) => SqlValue::Literal(b.to_string()),
            FilterValue::Integer(i) => SqlValue::Literal(i.to_string()),
            FilterValue::Unsigned(u) => SqlValue::Literal(u.to_string()),
            FilterValue::Float(f) => {
                if !f.is_finite() {
                    return Err(ValueError::Unsupported("non-finite float"));
                }
                // Display for f64 is the shortest repr that round-trips
                SqlValue::Literal(f.to_string())
            }
            FilterValue::String(s) => SqlValue::Literal(format!("'{}'", s)),
            FilterValue::Time(t) => {
                SqlValue::Literal(format!("'{}'::timestamp", t.format(TIMESTAMP_FORMAT)))
            }
            FilterValue::List(items) => SqlValue::List(
                items
                    .iter()
                    .map(FilterValue::to_sql_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            FilterValue::Object(_) => return Err(ValueError::Unsupported("object")),
        };
        Ok(value)
    }
}

/// Strip single and double quotes from a literal before it is embedded in a LIKE pattern
pub fn strip_quotes(literal: &str) -> String {
    literal.replace(['\'', '"'], "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_scalar_literals() {
        assert_eq!(
            FilterValue::Integer(-42).to_sql_value().unwrap(),
            SqlValue::Literal("-42".to_string())
        );
        assert_eq!(
            FilterValue::Unsigned(u64::MAX).to_sql_value().unwrap(),
            SqlValue::Literal("18446744073709551615".to_string())
        );
        assert_eq!(
            FilterValue::Float(100.5).to_sql_value().unwrap(),
            SqlValue::Literal("100.5".to_string())
        );
        assert_eq!(
            FilterValue::Float(0.1).to_sql_value().unwrap(),
            SqlValue::Literal("0.1".to_string())
        );
        assert_eq!(
            FilterValue::Bool(true).to_sql_value().unwrap(),
            SqlValue::Literal("true".to_string())
        );
        assert_eq!(
            FilterValue::from("shipped").to_sql_value().unwrap(),
            SqlValue::Literal("'shipped'".to_string())
        );
    }

    #[test]
    fn test_time_literal() {
        let ts = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            FilterValue::Time(ts).to_sql_value().unwrap(),
            SqlValue::Literal("'2022-01-01 00:00:00'::timestamp".to_string())
        );
    }

    #[test]
    fn test_list_recurses() {
        let value = FilterValue::List(vec![FilterValue::from("a"), FilterValue::Integer(1)]);
        let sql = value.to_sql_value().unwrap();
        assert_eq!(sql.as_literals().unwrap(), vec!["'a'", "1"]);
    }

    #[test]
    fn test_nested_list_is_not_literals() {
        let value = FilterValue::List(vec![FilterValue::strings(["a"])]);
        assert!(value.to_sql_value().unwrap().as_literals().is_none());
    }

    #[test]
    fn test_non_finite_float_rejected() {
        assert!(FilterValue::Float(f64::NAN).to_sql_value().is_err());
        assert!(FilterValue::Float(f64::INFINITY).to_sql_value().is_err());
    }

    #[test]
    fn test_object_rejected() {
        let mut map = serde_json::Map::new();
        map.insert("x".to_string(), serde_json::Value::from(1));
        let object = FilterValue::Object(map);
        assert_eq!(object.to_sql_value(), Err(ValueError::Unsupported("object")));
        assert!(FilterValue::List(vec![FilterValue::from("a"), object]).to_sql_value().is_err());
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("'it\"s'"), "its");
    }
}
