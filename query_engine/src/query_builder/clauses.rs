//! Per-operator SQL fragment builders
//!
//! Every builder takes the rendered column expression and the converted value
//! and returns one fragment wrapped in `( … )` so it nests inside any boolean
//! tree. Values arrive already converted to SQL literals, so strings carry
//! their single quotes; LIKE patterns strip them and add their own.

use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::operators::FilterOperator;
use type_mapping::{strip_quotes, Datatype, SqlValue};

fn expect_literal<'a>(operator: FilterOperator, value: &'a SqlValue) -> QueryResult<&'a str> {
    value.as_literal().ok_or_else(|| {
        QueryBuilderError::InvalidDataType(format!("'{}' expects a single value", operator))
    })
}

fn expect_literals(operator: FilterOperator, value: &SqlValue) -> QueryResult<Vec<&str>> {
    match value.as_literals() {
        Some(values) if !values.is_empty() => Ok(values),
        Some(_) => Err(QueryBuilderError::InvalidDataType(format!(
            "'{}' expects at least one value",
            operator
        ))),
        None => Err(QueryBuilderError::InvalidDataType(format!(
            "'{}' expects a list of values",
            operator
        ))),
    }
}

fn like_operand(literal: &str) -> String {
    strip_quotes(literal).to_lowercase()
}

/// `( col IN (v1, v2) )` and `( col NOT IN (v1, v2) )`.
///
/// An empty list is rejected as invalid data rather than rendered as `IN ()`,
/// which is not valid SQL. The contains and array builders do the same.
pub fn in_clause(column: &str, operator: FilterOperator, value: &SqlValue) -> QueryResult<String> {
    let values = expect_literals(operator, value)?;
    Ok(format!(
        "( {} {} ({}) )",
        column,
        operator.sql_token(),
        values.join(", ")
    ))
}

/// Case-insensitive substring match against any (contains) or none (ncontains) of the values
pub fn contains_clause(
    column: &str,
    operator: FilterOperator,
    value: &SqlValue,
) -> QueryResult<String> {
    let values = expect_literals(operator, value)?;
    let joiner = match operator {
        FilterOperator::NotContains => " AND ",
        _ => " OR ",
    };
    let parts: Vec<String> = values
        .iter()
        .map(|v| {
            format!(
                "LOWER({}) {} '%{}%'",
                column,
                operator.sql_token(),
                like_operand(v)
            )
        })
        .collect();
    Ok(format!("( {} )", parts.join(joiner)))
}

pub fn starts_with_clause(column: &str, value: &SqlValue) -> QueryResult<String> {
    let v = expect_literal(FilterOperator::StartsWith, value)?;
    Ok(format!("( LOWER({}) LIKE '{}%' )", column, like_operand(v)))
}

pub fn starts_with_case_sensitive_clause(column: &str, value: &SqlValue) -> QueryResult<String> {
    let v = expect_literal(FilterOperator::StartsWithCaseSensitive, value)?;
    Ok(format!("( {} LIKE '{}%' )", column, strip_quotes(v)))
}

pub fn ends_with_clause(column: &str, value: &SqlValue) -> QueryResult<String> {
    let v = expect_literal(FilterOperator::EndsWith, value)?;
    Ok(format!("( LOWER({}) LIKE '%{}' )", column, like_operand(v)))
}

pub fn between_clause(column: &str, value: &SqlValue) -> QueryResult<String> {
    let values = expect_literals(FilterOperator::InBetween, value)?;
    match values.as_slice() {
        [low, high] => Ok(format!("( {} BETWEEN {} AND {} )", column, low, high)),
        other => Err(QueryBuilderError::InvalidDataType(format!(
            "'inbetween' expects exactly 2 values, got {}",
            other.len()
        ))),
    }
}

pub fn is_null_clause(column: &str) -> String {
    format!("( {} IS NULL )", column)
}

/// `( col = v )` / `( col != v )`; the value is spliced in as converted
pub fn equality_clause(
    column: &str,
    operator: FilterOperator,
    value: &SqlValue,
) -> QueryResult<String> {
    let v = expect_literal(operator, value)?;
    Ok(format!("( {} {} {} )", column, operator.sql_token(), v))
}

/// Matches array columns whose joined text equals (array_in) or contains
/// (array_contains) any of the values
pub fn array_clause(
    column: &str,
    operator: FilterOperator,
    value: &SqlValue,
) -> QueryResult<String> {
    let values = expect_literals(operator, value)?;
    let parts: Vec<String> = values
        .iter()
        .map(|v| {
            let operand = like_operand(v);
            let rhs = match operator {
                FilterOperator::ArrayContains => format!("'%{}%'", operand),
                _ => format!("'{}'", operand),
            };
            format!(
                "( LOWER(ARRAY_TO_STRING({}, ',')) {} {} )",
                column,
                operator.sql_token(),
                rhs
            )
        })
        .collect();
    Ok(format!("( {} )", parts.join(" OR ")))
}

/// `( col OP v )` for operators without special handling
pub fn fallback_clause(
    column: &str,
    operator: FilterOperator,
    value: &SqlValue,
) -> QueryResult<String> {
    let v = expect_literal(operator, value)?;
    Ok(format!("( {} {} {} )", column, operator.sql_token(), v))
}

/// Route a condition to its builder, by column datatype first and operator second
pub fn build_clause(
    column: &str,
    datatype: Datatype,
    operator: FilterOperator,
    value: &SqlValue,
) -> QueryResult<String> {
    if datatype.is_array() != operator.is_array_operator() {
        return Err(QueryBuilderError::InvalidOperator(format!(
            "'{}' cannot be applied to a {} column",
            operator, datatype
        )));
    }

    match operator {
        FilterOperator::ArrayIn | FilterOperator::ArrayContains => {
            array_clause(column, operator, value)
        }
        FilterOperator::In | FilterOperator::NotIn => in_clause(column, operator, value),
        FilterOperator::Contains | FilterOperator::NotContains => {
            contains_clause(column, operator, value)
        }
        FilterOperator::StartsWith => starts_with_clause(column, value),
        FilterOperator::StartsWithCaseSensitive => {
            starts_with_case_sensitive_clause(column, value)
        }
        FilterOperator::EndsWith => ends_with_clause(column, value),
        FilterOperator::InBetween => between_clause(column, value),
        FilterOperator::IsNull => Ok(is_null_clause(column)),
        FilterOperator::Eq | FilterOperator::Neq => equality_clause(column, operator, value),
        FilterOperator::Gt
        | FilterOperator::Gte
        | FilterOperator::Lt
        | FilterOperator::Lte
        | FilterOperator::And
        | FilterOperator::Or => fallback_clause(column, operator, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> SqlValue {
        SqlValue::Literal(s.to_string())
    }

    fn list(items: &[&str]) -> SqlValue {
        SqlValue::List(items.iter().map(|s| lit(s)).collect())
    }

    #[test]
    fn test_in_and_not_in() {
        assert_eq!(
            in_clause("status", FilterOperator::In, &list(&["'a'", "'b'"])).unwrap(),
            "( status IN ('a', 'b') )"
        );
        assert_eq!(
            in_clause("id", FilterOperator::NotIn, &list(&["1", "2"])).unwrap(),
            "( id NOT IN (1, 2) )"
        );
    }

    #[test]
    fn test_in_requires_list() {
        assert!(matches!(
            in_clause("status", FilterOperator::In, &lit("'a'")),
            Err(QueryBuilderError::InvalidDataType(_))
        ));
        assert!(matches!(
            in_clause("status", FilterOperator::In, &SqlValue::List(vec![])),
            Err(QueryBuilderError::InvalidDataType(_))
        ));
    }

    #[test]
    fn test_contains_is_case_insensitive_and_quote_stripped() {
        assert_eq!(
            contains_clause("name", FilterOperator::Contains, &list(&["'Foo'", "'B\"ar'"])).unwrap(),
            "( LOWER(name) LIKE '%foo%' OR LOWER(name) LIKE '%bar%' )"
        );
    }

    #[test]
    fn test_not_contains_joins_with_and() {
        assert_eq!(
            contains_clause("name", FilterOperator::NotContains, &list(&["'x'", "'y'"])).unwrap(),
            "( LOWER(name) NOT LIKE '%x%' AND LOWER(name) NOT LIKE '%y%' )"
        );
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert_eq!(
            starts_with_clause("name", &lit("'Ab'")).unwrap(),
            "( LOWER(name) LIKE 'ab%' )"
        );
        assert_eq!(
            starts_with_case_sensitive_clause("name", &lit("'Ab'")).unwrap(),
            "( name LIKE 'Ab%' )"
        );
        assert_eq!(
            ends_with_clause("name", &lit("'Ab'")).unwrap(),
            "( LOWER(name) LIKE '%ab' )"
        );
        assert!(starts_with_clause("name", &list(&["'a'"])).is_err());
    }

    #[test]
    fn test_between() {
        assert_eq!(
            between_clause("price", &list(&["10", "20"])).unwrap(),
            "( price BETWEEN 10 AND 20 )"
        );
        assert!(matches!(
            between_clause("price", &list(&["10"])),
            Err(QueryBuilderError::InvalidDataType(_))
        ));
        assert!(between_clause("price", &list(&["1", "2", "3"])).is_err());
    }

    #[test]
    fn test_equality_passes_value_through() {
        assert_eq!(
            equality_clause("status", FilterOperator::Eq, &lit("'shipped'")).unwrap(),
            "( status = 'shipped' )"
        );
        assert_eq!(
            equality_clause("qty", FilterOperator::Neq, &lit("3")).unwrap(),
            "( qty != 3 )"
        );
        assert!(equality_clause("qty", FilterOperator::Eq, &SqlValue::Null).is_err());
    }

    #[test]
    fn test_array_in() {
        assert_eq!(
            array_clause("region", FilterOperator::ArrayIn, &list(&["'Europe'", "'Asia'"])).unwrap(),
            "( ( LOWER(ARRAY_TO_STRING(region, ',')) = 'europe' ) OR ( LOWER(ARRAY_TO_STRING(region, ',')) = 'asia' ) )"
        );
    }

    #[test]
    fn test_array_contains() {
        assert_eq!(
            array_clause("tags", FilterOperator::ArrayContains, &list(&["'Hot'"])).unwrap(),
            "( ( LOWER(ARRAY_TO_STRING(tags, ',')) LIKE '%hot%' ) )"
        );
    }

    #[test]
    fn test_fallback_comparisons() {
        assert_eq!(
            fallback_clause("total", FilterOperator::Gte, &lit("100")).unwrap(),
            "( total >= 100 )"
        );
        assert!(fallback_clause("total", FilterOperator::Lt, &list(&["1"])).is_err());
    }

    #[test]
    fn test_array_column_routing() {
        for op in FilterOperator::ALL {
            let result = build_clause("region", Datatype::ArrayOfString, op, &list(&["'a'"]));
            if op.is_array_operator() {
                assert!(result.is_ok(), "{} should be accepted", op);
            } else {
                assert!(
                    matches!(result, Err(QueryBuilderError::InvalidOperator(_))),
                    "{} should be rejected",
                    op
                );
            }
        }
    }

    #[test]
    fn test_array_operator_on_scalar_column() {
        assert!(matches!(
            build_clause("region", Datatype::String, FilterOperator::ArrayIn, &list(&["'a'"])),
            Err(QueryBuilderError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_is_null_ignores_value() {
        assert_eq!(
            build_clause("x", Datatype::String, FilterOperator::IsNull, &SqlValue::Null).unwrap(),
            "( x IS NULL )"
        );
    }
}
