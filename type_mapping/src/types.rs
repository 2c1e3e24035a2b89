//! Type mapping definitions
//!
//! This module provides the semantic column datatypes and the closed set of
//! values a filter can carry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Semantic type tag of a dataset column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Date,
    Datetime,
    Boolean,
    ArrayOfString,
}

impl Datatype {
    /// Array columns only accept the array filter operators
    pub fn is_array(&self) -> bool {
        matches!(self, Datatype::ArrayOfString)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Datatype::String => "string",
            Datatype::Integer => "integer",
            Datatype::Decimal => "decimal",
            Datatype::Date => "date",
            Datatype::Datetime => "datetime",
            Datatype::Boolean => "boolean",
            Datatype::ArrayOfString => "array_of_string",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value attached to a filter condition.
///
/// JSON input maps one-to-one onto these variants (see [`crate::serialize`]);
/// `Time` is only produced programmatically, strings are never parsed as dates.
/// `Object` is kept so a payload round-trips, but it has no SQL form.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
    Time(DateTime<Utc>),
    List(Vec<FilterValue>),
    Object(Map<String, Value>),
}

impl FilterValue {
    /// Build a list of string values
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(values.into_iter().map(|v| FilterValue::String(v.into())).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Short kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FilterValue::Null => "null",
            FilterValue::Bool(_) => "bool",
            FilterValue::Integer(_) => "integer",
            FilterValue::Unsigned(_) => "unsigned",
            FilterValue::Float(_) => "float",
            FilterValue::String(_) => "string",
            FilterValue::Time(_) => "time",
            FilterValue::List(_) => "list",
            FilterValue::Object(_) => "object",
        }
    }
}

impl From<String> for FilterValue {
    fn from(val: String) -> Self {
        FilterValue::String(val)
    }
}

impl From<&str> for FilterValue {
    fn from(val: &str) -> Self {
        FilterValue::String(val.to_string())
    }
}

impl From<i32> for FilterValue {
    fn from(val: i32) -> Self {
        FilterValue::Integer(val as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(val: i64) -> Self {
        FilterValue::Integer(val)
    }
}

impl From<u32> for FilterValue {
    fn from(val: u32) -> Self {
        FilterValue::Unsigned(val as u64)
    }
}

impl From<u64> for FilterValue {
    fn from(val: u64) -> Self {
        FilterValue::Unsigned(val)
    }
}

impl From<f64> for FilterValue {
    fn from(val: f64) -> Self {
        FilterValue::Float(val)
    }
}

impl From<bool> for FilterValue {
    fn from(val: bool) -> Self {
        FilterValue::Bool(val)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(val: DateTime<Utc>) -> Self {
        FilterValue::Time(val)
    }
}

impl<T> From<Vec<T>> for FilterValue
where
    T: Into<FilterValue>,
{
    fn from(val: Vec<T>) -> Self {
        FilterValue::List(val.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for FilterValue
where
    T: Into<FilterValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => FilterValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_serde_tags() {
        let parsed: Datatype = serde_json::from_str("\"array_of_string\"").unwrap();
        assert_eq!(parsed, Datatype::ArrayOfString);
        assert!(parsed.is_array());
        assert!(!Datatype::String.is_array());
        assert_eq!(serde_json::to_string(&Datatype::Decimal).unwrap(), "\"decimal\"");
    }

    #[test]
    fn test_filter_value_from_conversions() {
        assert_eq!(FilterValue::from("a"), FilterValue::String("a".to_string()));
        assert_eq!(FilterValue::from(7_i32), FilterValue::Integer(7));
        assert_eq!(FilterValue::from(7_u64), FilterValue::Unsigned(7));
        assert_eq!(FilterValue::from(None::<bool>), FilterValue::Null);
        assert_eq!(
            FilterValue::from(vec!["a", "b"]),
            FilterValue::strings(["a", "b"])
        );
    }
}
