//! Boolean filter trees
//!
//! A filter is either a single condition or a group of filters combined with
//! one logical operator. Clients send the looser legacy shape, where one node
//! may carry both its own condition and child conditions; decoding folds that
//! into a group whose first child is the node's own condition.

use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::column::ColumnConfig;
use crate::query_builder::operators::{FilterOperator, LogicalOperator};
use serde::{Deserialize, Serialize};
use type_mapping::FilterValue;

/// Single condition in WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCondition {
    pub column: ColumnConfig,
    /// Abstract operator name, resolved against the operator table at compile time
    pub operator: String,
    pub value: FilterValue,
}

/// Filter tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireFilter", into = "WireFilter")]
pub enum FilterNode {
    Leaf(FilterCondition),
    Group {
        logical_operator: LogicalOperator,
        conditions: Vec<FilterNode>,
    },
}

impl FilterNode {
    /// Create a simple condition
    pub fn leaf(
        column: impl Into<ColumnConfig>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self::Leaf(FilterCondition {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        })
    }

    pub fn group(logical_operator: LogicalOperator, conditions: Vec<FilterNode>) -> Self {
        Self::Group {
            logical_operator,
            conditions,
        }
    }

    /// Create AND group
    pub fn and(conditions: Vec<FilterNode>) -> Self {
        Self::group(LogicalOperator::And, conditions)
    }

    /// Create OR group
    pub fn or(conditions: Vec<FilterNode>) -> Self {
        Self::group(LogicalOperator::Or, conditions)
    }

    pub fn eq(column: impl Into<ColumnConfig>, value: impl Into<FilterValue>) -> Self {
        Self::leaf(column, FilterOperator::Eq, value)
    }

    pub fn neq(column: impl Into<ColumnConfig>, value: impl Into<FilterValue>) -> Self {
        Self::leaf(column, FilterOperator::Neq, value)
    }

    pub fn gt(column: impl Into<ColumnConfig>, value: impl Into<FilterValue>) -> Self {
        Self::leaf(column, FilterOperator::Gt, value)
    }

    pub fn lt(column: impl Into<ColumnConfig>, value: impl Into<FilterValue>) -> Self {
        Self::leaf(column, FilterOperator::Lt, value)
    }

    pub fn in_values(column: impl Into<ColumnConfig>, values: Vec<FilterValue>) -> Self {
        Self::leaf(column, FilterOperator::In, FilterValue::List(values))
    }

    pub fn is_null(column: impl Into<ColumnConfig>) -> Self {
        Self::leaf(column, FilterOperator::IsNull, FilterValue::Null)
    }

    /// Depth of the tree; a lone condition has depth 1
    pub fn depth(&self) -> usize {
        match self {
            FilterNode::Leaf(_) => 1,
            FilterNode::Group { conditions, .. } => {
                1 + conditions.iter().map(FilterNode::depth).max().unwrap_or(0)
            }
        }
    }
}

/// Top-level filter: conditions joined by one logical operator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireFilterModel")]
pub struct FilterModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
    #[serde(default)]
    pub conditions: Vec<FilterNode>,
}

impl FilterModel {
    pub fn new(logical_operator: LogicalOperator, conditions: Vec<FilterNode>) -> Self {
        Self {
            logical_operator: Some(logical_operator),
            conditions,
        }
    }

    /// Model with one condition, which needs no logical operator
    pub fn single(condition: FilterNode) -> Self {
        Self {
            logical_operator: None,
            conditions: vec![condition],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.conditions.iter().map(FilterNode::depth).max().unwrap_or(0)
    }

    pub fn from_json(json: &str) -> QueryResult<Self> {
        serde_json::from_str(json).map_err(|e| QueryBuilderError::InvalidDataType(e.to_string()))
    }
}

/// Wire shape of the top-level filter.
///
/// The operator arrives as free text: clients send `""` or a stray value next
/// to a single condition, where no operator is needed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFilterModel {
    #[serde(default)]
    logical_operator: Option<String>,
    #[serde(default)]
    conditions: Vec<FilterNode>,
}

impl TryFrom<WireFilterModel> for FilterModel {
    type Error = QueryBuilderError;

    fn try_from(wire: WireFilterModel) -> Result<Self, Self::Error> {
        let logical_operator = match wire.logical_operator.as_deref() {
            None | Some("") => None,
            Some(op) => match op.parse::<LogicalOperator>() {
                Ok(op) => Some(op),
                Err(_) if wire.conditions.len() < 2 => None,
                Err(e) => return Err(e),
            },
        };
        Ok(FilterModel {
            logical_operator,
            conditions: wire.conditions,
        })
    }
}

/// Legacy wire shape of a filter node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logical_operator: Option<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column: Option<ColumnConfig>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    operator: String,
    #[serde(default, skip_serializing_if = "FilterValue::is_null")]
    value: FilterValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<FilterNode>,
}

fn group_operator(
    logical_operator: Option<LogicalOperator>,
    siblings: usize,
) -> QueryResult<LogicalOperator> {
    match logical_operator {
        Some(op) => Ok(op),
        // a single condition never needs an operator
        None if siblings < 2 => Ok(LogicalOperator::And),
        None => Err(QueryBuilderError::InvalidDataType(format!(
            "{} sibling conditions need a logical operator",
            siblings
        ))),
    }
}

impl TryFrom<WireFilter> for FilterNode {
    type Error = QueryBuilderError;

    fn try_from(wire: WireFilter) -> Result<Self, Self::Error> {
        if wire.operator.is_empty() {
            if wire.conditions.is_empty() {
                return Err(QueryBuilderError::NoConditions);
            }
            let logical_operator = group_operator(wire.logical_operator, wire.conditions.len())?;
            return Ok(FilterNode::group(logical_operator, wire.conditions));
        }

        let column = wire.column.ok_or_else(|| {
            QueryBuilderError::InvalidDataType(format!(
                "filter condition '{}' has no column",
                wire.operator
            ))
        })?;
        let leaf = FilterNode::Leaf(FilterCondition {
            column,
            operator: wire.operator,
            value: wire.value,
        });

        if wire.conditions.is_empty() {
            return Ok(leaf);
        }

        let logical_operator = group_operator(wire.logical_operator, wire.conditions.len() + 1)?;
        let mut conditions = Vec::with_capacity(wire.conditions.len() + 1);
        conditions.push(leaf);
        conditions.extend(wire.conditions);
        Ok(FilterNode::group(logical_operator, conditions))
    }
}

impl From<FilterNode> for WireFilter {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::Leaf(condition) => WireFilter {
                column: Some(condition.column),
                operator: condition.operator,
                value: condition.value,
                ..Default::default()
            },
            FilterNode::Group {
                logical_operator,
                conditions,
            } => WireFilter {
                logical_operator: Some(logical_operator),
                conditions,
                ..Default::default()
            },
        }
    }
}
