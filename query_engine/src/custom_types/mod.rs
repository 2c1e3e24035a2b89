//! Custom column data types
//!
//! A column may carry a [`CustomDataConfig`] naming a strategy that overrides
//! how the column renders in SELECT, GROUP BY, filter and aggregate positions.
//! Strategies are looked up by their type tag in a [`CustomTypeRegistry`], so a
//! new type only needs a registration, never a change to the compiler.

mod amount;

pub use amount::{AmountConfig, AmountType, AMOUNT_TYPE};

use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::column::ColumnConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Custom type selection attached to a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDataConfig {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub config: Value,
}

impl CustomDataConfig {
    pub fn new(type_tag: impl Into<String>, config: Value) -> Self {
        Self {
            type_tag: type_tag.into(),
            config,
        }
    }
}

/// Rendering strategy for a custom column type
pub trait CustomDataType: fmt::Debug + Send + Sync {
    /// Projection for a plain SELECT, including any synthetic columns
    fn select_column(&self, column: &ColumnConfig) -> QueryResult<String>;

    /// Expression used in the GROUP BY clause
    fn group_by_column(&self, column: &ColumnConfig) -> QueryResult<String>;

    /// Expression compared against filter values
    fn filter_column(&self, column: &ColumnConfig) -> QueryResult<String>;

    /// Expression wrapped by aggregate functions
    fn aggregation_column(&self, column: &ColumnConfig) -> QueryResult<String>;

    fn validate(&self) -> QueryResult<()>;
}

pub type CustomTypeFactory =
    Arc<dyn Fn(&Value) -> QueryResult<Box<dyn CustomDataType>> + Send + Sync>;

/// Lookup table from type tag to strategy factory
#[derive(Clone)]
pub struct CustomTypeRegistry {
    factories: HashMap<String, CustomTypeFactory>,
}

impl CustomTypeRegistry {
    /// Registry without any custom types
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry with the built-in types
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(AMOUNT_TYPE, |config: &Value| {
            AmountType::from_config(config).map(|t| Box::new(t) as Box<dyn CustomDataType>)
        });
        registry
    }

    /// Register a strategy factory under a type tag, replacing any previous one
    pub fn register<F>(&mut self, type_tag: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Value) -> QueryResult<Box<dyn CustomDataType>> + Send + Sync + 'static,
    {
        self.factories.insert(type_tag.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.factories.contains_key(type_tag)
    }

    /// Build and validate the strategy for a column's custom config
    pub fn resolve(&self, config: &CustomDataConfig) -> QueryResult<Box<dyn CustomDataType>> {
        let factory = self
            .factories
            .get(&config.type_tag)
            .ok_or_else(|| QueryBuilderError::InvalidCustomDataType(config.type_tag.clone()))?;

        let strategy = factory(&config.config)?;
        strategy.validate()?;
        Ok(strategy)
    }
}

impl Default for CustomTypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CustomTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&String> = self.factories.keys().collect();
        tags.sort();
        f.debug_struct("CustomTypeRegistry").field("types", &tags).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Upper;

    impl CustomDataType for Upper {
        fn select_column(&self, column: &ColumnConfig) -> QueryResult<String> {
            Ok(format!("UPPER({})", column.column))
        }
        fn group_by_column(&self, column: &ColumnConfig) -> QueryResult<String> {
            self.select_column(column)
        }
        fn filter_column(&self, column: &ColumnConfig) -> QueryResult<String> {
            self.select_column(column)
        }
        fn aggregation_column(&self, column: &ColumnConfig) -> QueryResult<String> {
            Ok(column.column.clone())
        }
        fn validate(&self) -> QueryResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unknown_tag() {
        let registry = CustomTypeRegistry::with_defaults();
        let err = registry
            .resolve(&CustomDataConfig::new("percentage", json!({})))
            .unwrap_err();
        assert_eq!(err, QueryBuilderError::InvalidCustomDataType("percentage".to_string()));
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = CustomTypeRegistry::empty();
        assert!(!registry.contains(AMOUNT_TYPE));
        assert!(CustomTypeRegistry::default().contains(AMOUNT_TYPE));
    }

    #[test]
    fn test_register_custom_strategy() {
        let mut registry = CustomTypeRegistry::empty();
        registry.register("upper", |_: &Value| Ok(Box::new(Upper) as Box<dyn CustomDataType>));

        let strategy = registry
            .resolve(&CustomDataConfig::new("upper", Value::Null))
            .unwrap();
        let column = ColumnConfig::new("name");
        assert_eq!(strategy.select_column(&column).unwrap(), "UPPER(name)");
    }

    #[test]
    fn test_custom_data_config_wire_shape() {
        let config: CustomDataConfig = serde_json::from_value(json!({
            "type": "amount",
            "config": {"amountColumn": "amt"}
        }))
        .unwrap();
        assert_eq!(config.type_tag, "amount");
        assert_eq!(config.config["amountColumn"], "amt");
    }
}
