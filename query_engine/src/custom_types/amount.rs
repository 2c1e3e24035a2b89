use super::CustomDataType;
use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::column::ColumnConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const AMOUNT_TYPE: &str = "amount";

/// Settings for a currency-converted amount column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AmountConfig {
    pub amount_column: String,
    pub currency_column: String,
    /// Currency every amount is converted into
    pub fx_currency: String,
}

/// Renders an amount column converted into a single reporting currency,
/// alongside a synthetic column naming that currency.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountType {
    config: AmountConfig,
}

impl AmountType {
    pub fn new(config: AmountConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Value) -> QueryResult<Self> {
        let config: AmountConfig = serde_json::from_value(config.clone())
            .map_err(|e| QueryBuilderError::InvalidCustomDataTypeConfig(e.to_string()))?;
        Ok(Self::new(config))
    }

    fn converted_expression(&self) -> String {
        format!(
            "convert_currency({}, {}, '{}')",
            self.config.amount_column, self.config.currency_column, self.config.fx_currency
        )
    }

    fn output_name<'a>(&self, column: &'a ColumnConfig) -> &'a str {
        column.alias.as_deref().unwrap_or(&column.column)
    }
}

impl CustomDataType for AmountType {
    fn select_column(&self, column: &ColumnConfig) -> QueryResult<String> {
        let name = self.output_name(column);
        Ok(format!(
            "{} AS \"{}\", '{}' AS \"{}_currency\"",
            self.converted_expression(),
            name,
            self.config.fx_currency,
            name
        ))
    }

    fn group_by_column(&self, column: &ColumnConfig) -> QueryResult<String> {
        Ok(format!("\"{}\"", self.output_name(column)))
    }

    fn filter_column(&self, _column: &ColumnConfig) -> QueryResult<String> {
        Ok(self.converted_expression())
    }

    fn aggregation_column(&self, _column: &ColumnConfig) -> QueryResult<String> {
        Ok(self.converted_expression())
    }

    fn validate(&self) -> QueryResult<()> {
        let missing: Vec<&str> = [
            ("amountColumn", &self.config.amount_column),
            ("currencyColumn", &self.config.currency_column),
            ("fxCurrency", &self.config.fx_currency),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(QueryBuilderError::InvalidCustomDataTypeConfig(format!(
                "amount type requires {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn amount() -> AmountType {
        AmountType::from_config(&json!({
            "amountColumn": "amount",
            "currencyColumn": "currency_code",
            "fxCurrency": "USD"
        }))
        .unwrap()
    }

    #[test]
    fn test_select_adds_currency_column() {
        let column = ColumnConfig::new("amount").with_alias("net");
        assert_eq!(
            amount().select_column(&column).unwrap(),
            "convert_currency(amount, currency_code, 'USD') AS \"net\", 'USD' AS \"net_currency\""
        );
    }

    #[test]
    fn test_select_without_alias_uses_column_name() {
        let column = ColumnConfig::new("amount");
        assert!(amount()
            .select_column(&column)
            .unwrap()
            .ends_with("'USD' AS \"amount_currency\""));
    }

    #[test]
    fn test_group_by_references_output_name() {
        let column = ColumnConfig::new("amount").with_alias("net");
        assert_eq!(amount().group_by_column(&column).unwrap(), "\"net\"");
    }

    #[test]
    fn test_filter_and_aggregate_use_converted_expression() {
        let column = ColumnConfig::new("amount");
        let expected = "convert_currency(amount, currency_code, 'USD')";
        assert_eq!(amount().filter_column(&column).unwrap(), expected);
        assert_eq!(amount().aggregation_column(&column).unwrap(), expected);
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let strategy = AmountType::from_config(&json!({"amountColumn": "amount"})).unwrap();
        let err = strategy.validate().unwrap_err();
        assert_eq!(
            err,
            QueryBuilderError::InvalidCustomDataTypeConfig(
                "amount type requires currencyColumn, fxCurrency".to_string()
            )
        );
        assert!(amount().validate().is_ok());
    }

    #[test]
    fn test_malformed_config() {
        let err = AmountType::from_config(&json!({"amountColumn": 5})).unwrap_err();
        assert!(matches!(err, QueryBuilderError::InvalidCustomDataTypeConfig(_)));
    }
}
