use tessera_column::datatype::DataType;
use tessera_column::scalar::ScalarValue;
use tessera_error::{Result, TesseraError};
use tessera_plan::expr::column_expr::ColumnExpr;
use tessera_plan::expr::comparison_expr::{ComparisonExpr, ComparisonOperator};
use tessera_plan::expr::conjunction_expr::{ConjunctionExpr, ConjunctionOperator};
use tessera_plan::expr::between_expr::BetweenExpr;
use tessera_plan::expr::literal_expr::LiteralExpr;
use tessera_plan::expr::Expression;
use tessera_plan::lqp::node::{ColumnId, LqpNodeRef};

use crate::config::{CalibrationColumnSpecification, CalibrationTableSpecification, Selectivity};
use crate::generator::PredicateConfiguration;

/// Builds one predicate shape over a stored-table leaf, or skips (`None`)
/// when the table has no column of the required data type and encoding.
pub type PredicateGenerator =
    fn(&LqpNodeRef, &CalibrationTableSpecification, &PredicateConfiguration) -> Result<Option<Expression>>;

/// Every predicate shape the calibration run permutes over.
pub const PREDICATE_GENERATORS: &[(&str, PredicateGenerator)] = &[
    ("between_value_value", between_value_value),
    ("between_column_column", between_column_column),
    ("column_value", column_value),
    ("column_column", column_column),
    ("like", like),
    ("equi_on_strings", equi_on_strings),
    ("or", or),
];

fn column_expr(table_node: &LqpNodeRef, idx: usize) -> Expression {
    Expression::Column(ColumnExpr::new(table_node, ColumnId(idx)))
}

/// `<column> BETWEEN <value> AND <value>`, the bounds spanning the requested
/// fraction of the column domain.
pub fn between_value_value(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, column)) = matches.first() else {
        return Ok(None);
    };

    let lower = generate_value_expression(column, Selectivity::new(0.0)?, false)?;
    let upper = generate_value_expression(column, config.selectivity, false)?;
    let between = BetweenExpr::try_new(column_expr(table_node, idx), lower, upper)?;
    Ok(Some(Expression::Between(between)))
}

/// `<column> BETWEEN <column> AND <column>` over three same-typed columns.
pub fn between_column_column(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, _)) = matches.first() else {
        return Ok(None);
    };

    let mut bounds = table
        .columns_of_type(config.data_type)
        .into_iter()
        .filter(|&(bound_idx, _)| bound_idx != idx);
    let (Some((lower_idx, _)), Some((upper_idx, _))) = (bounds.next(), bounds.next()) else {
        return Ok(None);
    };

    let between = BetweenExpr::try_new(
        column_expr(table_node, idx),
        column_expr(table_node, lower_idx),
        column_expr(table_node, upper_idx),
    )?;
    Ok(Some(Expression::Between(between)))
}

/// `<column> <= <value>`.
pub fn column_value(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, column)) = matches.first() else {
        return Ok(None);
    };

    let value = generate_value_expression(column, config.selectivity, false)?;
    let cmp = ComparisonExpr::try_new(column_expr(table_node, idx), ComparisonOperator::LtEq, value)?;
    Ok(Some(Expression::Comparison(cmp)))
}

/// `<column> <= <column>` over two same-typed columns.
pub fn column_column(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, _)) = matches.first() else {
        return Ok(None);
    };

    let Some((other_idx, _)) = table
        .columns_of_type(config.data_type)
        .into_iter()
        .find(|&(other_idx, _)| other_idx != idx)
    else {
        return Ok(None);
    };

    let cmp = ComparisonExpr::try_new(
        column_expr(table_node, idx),
        ComparisonOperator::LtEq,
        column_expr(table_node, other_idx),
    )?;
    Ok(Some(Expression::Comparison(cmp)))
}

/// `<column> LIKE '<prefix>%'` on a string column.
pub fn like(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    if config.data_type != DataType::String {
        return Ok(None);
    }
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, column)) = matches.first() else {
        return Ok(None);
    };

    let pattern = generate_value_expression(column, config.selectivity, true)?;
    let cmp = ComparisonExpr::try_new(column_expr(table_node, idx), ComparisonOperator::Like, pattern)?;
    Ok(Some(Expression::Comparison(cmp)))
}

/// `<column> = '<value>'` on a string column.
pub fn equi_on_strings(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    if config.data_type != DataType::String {
        return Ok(None);
    }
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, column)) = matches.first() else {
        return Ok(None);
    };

    let value = generate_value_expression(column, config.selectivity, false)?;
    let cmp = ComparisonExpr::try_new(column_expr(table_node, idx), ComparisonOperator::Eq, value)?;
    Ok(Some(Expression::Comparison(cmp)))
}

/// Disjunction of two range predicates, each covering half the requested
/// selectivity from one end of the domain.
pub fn or(
    table_node: &LqpNodeRef,
    table: &CalibrationTableSpecification,
    config: &PredicateConfiguration,
) -> Result<Option<Expression>> {
    let matches = table.matching_columns(config.data_type, config.encoding);
    let Some(&(idx, column)) = matches.first() else {
        return Ok(None);
    };

    let half = config.selectivity.value() / 2.0;
    let low = ComparisonExpr::try_new(
        column_expr(table_node, idx),
        ComparisonOperator::LtEq,
        generate_value_expression(column, Selectivity::new(half)?, false)?,
    )?;
    let high = ComparisonExpr::try_new(
        column_expr(table_node, idx),
        ComparisonOperator::GtEq,
        generate_value_expression(column, Selectivity::new(1.0 - half)?, false)?,
    )?;

    Ok(Some(Expression::Conjunction(ConjunctionExpr::new(
        ConjunctionOperator::Or,
        [Expression::Comparison(low), Expression::Comparison(high)],
    ))))
}

/// A literal drawn from the deterministic ordering of the column domain:
/// position 0 holds the smallest value, the last position the largest.
///
/// With `trailing_like` the value gets a `%` wildcard appended for a LIKE
/// prefix match; only string columns support this.
pub fn generate_value_expression(
    column: &CalibrationColumnSpecification,
    selectivity: Selectivity,
    trailing_like: bool,
) -> Result<Expression> {
    let domain = column.row_count.max(1);
    let position = (selectivity.value() * (domain - 1) as f64).round() as usize;

    if trailing_like {
        if column.data_type != DataType::String {
            return Err(TesseraError::invariant_violation(format!(
                "trailing wildcard requires a string column, got {}",
                column.data_type
            )));
        }
        return Ok(Expression::Literal(LiteralExpr::new(format!(
            "{}%",
            string_value(position)
        ))));
    }

    let value = match column.data_type {
        DataType::Int => ScalarValue::Int(position as i32),
        DataType::Long => ScalarValue::Long(position as i64),
        DataType::Float => ScalarValue::Float(position as f32),
        DataType::Double => ScalarValue::Double(position as f64),
        DataType::String => ScalarValue::String(string_value(position)),
        DataType::Null => {
            return Err(TesseraError::incompatible_types(
                "cannot generate a value for a Null column",
            ))
        }
    };

    Ok(Expression::Literal(LiteralExpr::new(value)))
}

/// Strings ordered the same way their domain positions are.
fn string_value(position: usize) -> String {
    format!("{position:010}")
}
