//! Column references and their per-position rendering
//!
//! The same column renders differently depending on where it appears in the
//! statement: aliases are only declared in SELECT and referenced elsewhere,
//! array columns unnest when grouped, and custom data types override all of it.

use crate::custom_types::{CustomDataConfig, CustomTypeRegistry};
use crate::errors::{QueryBuilderError, QueryResult};
use serde::{Deserialize, Serialize};
use type_mapping::Datatype;

/// One column reference with its rendering strategy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    /// Raw column expression, interpolated verbatim
    pub column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data_config: Option<CustomDataConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl ColumnConfig {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ..Default::default()
        }
    }

    /// Column with a datatype, the usual shape for filter and group-by targets
    pub fn typed(column: impl Into<String>, datatype: Datatype) -> Self {
        Self::new(column).with_datatype(datatype)
    }

    pub fn with_datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = Some(datatype);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_custom_type(mut self, config: CustomDataConfig) -> Self {
        self.custom_data_config = Some(config);
        self
    }

    pub fn is_array(&self) -> bool {
        self.datatype.is_some_and(|d| d.is_array())
    }

    fn quoted_alias(&self) -> Option<String> {
        self.alias.as_ref().map(|alias| format!("\"{}\"", alias))
    }

    fn with_declared_alias(&self, expression: String) -> String {
        match &self.alias {
            Some(alias) => format!("{} AS \"{}\"", expression, alias),
            None => expression,
        }
    }

    fn require_datatype(&self, position: &str) -> QueryResult<Datatype> {
        self.datatype.ok_or_else(|| {
            QueryBuilderError::InvalidDataType(format!(
                "column '{}' needs a datatype to be used in {}",
                self.column, position
            ))
        })
    }

    fn unnested(&self) -> String {
        format!("unnest({})", self.column)
    }

    /// Projection in a plain SELECT list
    pub fn select_column(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        if let Some(custom) = &self.custom_data_config {
            return registry.resolve(custom)?.select_column(self);
        }
        Ok(self.with_declared_alias(self.column.clone()))
    }

    /// Projection in the SELECT list of a grouped query
    pub fn group_by_select_column(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        let datatype = self.require_datatype("GROUP BY")?;
        if let Some(custom) = &self.custom_data_config {
            return registry.resolve(custom)?.select_column(self);
        }
        if datatype.is_array() {
            return Ok(self.with_declared_alias(self.unnested()));
        }
        Ok(self.with_declared_alias(self.column.clone()))
    }

    /// Expression in the GROUP BY clause; references the alias when one is declared
    pub fn group_by_column(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        let datatype = self.require_datatype("GROUP BY")?;
        if let Some(custom) = &self.custom_data_config {
            return registry.resolve(custom)?.group_by_column(self);
        }
        if let Some(alias) = self.quoted_alias() {
            return Ok(alias);
        }
        if datatype.is_array() {
            return Ok(self.unnested());
        }
        Ok(self.column.clone())
    }

    /// Expression on the left-hand side of a filter condition
    pub fn filter_column(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        self.require_datatype("a filter")?;
        if let Some(custom) = &self.custom_data_config {
            return registry.resolve(custom)?.filter_column(self);
        }
        Ok(self.column.clone())
    }

    /// Argument of an aggregate function
    pub fn aggregation_column(&self, registry: &CustomTypeRegistry) -> QueryResult<String> {
        if let Some(custom) = &self.custom_data_config {
            return registry.resolve(custom)?.aggregation_column(self);
        }
        Ok(self.column.clone())
    }

    /// Expression in ORDER BY and window clauses. Never consults datatype or custom type.
    pub fn order_by_column(&self) -> String {
        self.quoted_alias().unwrap_or_else(|| self.column.clone())
    }
}

impl From<&str> for ColumnConfig {
    fn from(column: &str) -> Self {
        ColumnConfig::new(column)
    }
}
