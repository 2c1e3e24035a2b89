//! Serialization utilities
//!
//! This module maps JSON payloads onto [`FilterValue`] and back.

use crate::types::FilterValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FilterValue::Null,
            Value::Bool(b) => FilterValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FilterValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    FilterValue::Unsigned(u)
                } else {
                    // serde_json numbers without arbitrary precision always fit f64
                    FilterValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FilterValue::String(s),
            Value::Array(items) => FilterValue::List(items.into_iter().map(FilterValue::from).collect()),
            Value::Object(map) => FilterValue::Object(map),
        }
    }
}

impl From<&FilterValue> for Value {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Null => Value::Null,
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Integer(i) => Value::from(*i),
            FilterValue::Unsigned(u) => Value::from(*u),
            FilterValue::Float(f) => Value::from(*f),
            FilterValue::String(s) => Value::String(s.clone()),
            FilterValue::Time(t) => Value::String(t.to_rfc3339()),
            FilterValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            FilterValue::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FilterValue::from)
    }
}
