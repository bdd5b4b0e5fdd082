use tessera_error::{Result, TesseraError};

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::Expression;

use super::constraints::UniqueConstraint;
use super::node::{ColumnId, LqpNode, LqpNodeRef, NodeKind};

/// Projects the input onto a new list of expressions.
#[derive(Debug)]
pub struct ProjectionNode {
    pub expressions: Vec<Expression>,
}

impl ProjectionNode {
    pub fn new(expressions: impl IntoIterator<Item = Expression>, input: LqpNodeRef) -> LqpNodeRef {
        LqpNode::build(
            NodeKind::Projection(ProjectionNode {
                expressions: expressions.into_iter().collect(),
            }),
            Some(input),
            None,
        )
    }

    pub(crate) fn output_expression(&self, column: ColumnId) -> Result<&Expression> {
        self.expressions.get(column.0).ok_or_else(|| {
            TesseraError::unknown_column(format!(
                "no projection at index {column} ({} expressions)",
                self.expressions.len()
            ))
        })
    }

    /// An input constraint survives iff every one of its columns appears
    /// verbatim in the projection list; anything else is dropped.
    pub(crate) fn constraints(&self, node: &LqpNode) -> Result<Vec<UniqueConstraint>> {
        let input = node.left_input_required()?;
        Ok(input
            .constraints()?
            .into_iter()
            .filter(|constraint| constraint.all_columns_in(&self.expressions))
            .collect())
    }
}

impl Explainable for ProjectionNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        ExplainEntry::new("Projection").with_values("expressions", &self.expressions)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_column::datatype::DataType;
    use tessera_column::field::Field;

    use super::*;
    use crate::catalog::TableEntry;
    use crate::expr::aggregate_expr::{AggregateExpr, AggregateFunction};
    use crate::expr::column_expr::ColumnExpr;
    use crate::lqp::stored_table::StoredTableNode;

    fn customers() -> LqpNodeRef {
        StoredTableNode::new(Arc::new(
            TableEntry::new(
                "customers",
                [
                    Field::new("c_id", DataType::Int, false),
                    Field::new("c_region", DataType::Int, false),
                    Field::new("c_name", DataType::String, true),
                ],
                500,
            )
            .with_unique_constraint([0])
            .with_unique_constraint([1, 2]),
        ))
    }

    fn column(node: &LqpNodeRef, idx: usize) -> Expression {
        Expression::Column(ColumnExpr::new(node, ColumnId(idx)))
    }

    #[test]
    fn output_is_the_projection_list() {
        let table = customers();
        let projection = ProjectionNode::new([column(&table, 2), column(&table, 0)], table.clone());

        let columns = projection.column_expressions().unwrap();
        assert_eq!(vec![column(&table, 2), column(&table, 0)], columns);

        // Nullability follows the projected expression, not the position.
        assert!(projection.is_column_nullable(ColumnId(0)).unwrap());
        assert!(!projection.is_column_nullable(ColumnId(1)).unwrap());
    }

    #[test]
    fn constraints_forward_when_columns_survive() {
        let table = customers();
        let projection = ProjectionNode::new([column(&table, 0), column(&table, 2)], table.clone());

        // {c_id} survives, {c_region, c_name} lost its region column.
        assert_eq!(
            vec![UniqueConstraint::new([column(&table, 0)])],
            projection.constraints().unwrap()
        );
    }

    #[test]
    fn multi_column_constraint_survives_in_any_order() {
        let table = customers();
        let projection = ProjectionNode::new([column(&table, 2), column(&table, 1)], table.clone());

        assert_eq!(
            vec![UniqueConstraint::new([column(&table, 1), column(&table, 2)])],
            projection.constraints().unwrap()
        );
    }

    #[test]
    fn derived_expressions_drop_constraints() {
        let table = customers();
        // An aggregate over c_id is not the bare column, the key is gone.
        let projection = ProjectionNode::new(
            [Expression::Aggregate(AggregateExpr::new(
                AggregateFunction::Min,
                column(&table, 0),
            ))],
            table,
        );

        assert!(projection.constraints().unwrap().is_empty());
    }

    #[test]
    fn projected_field_names() {
        let table = customers();
        let projection = ProjectionNode::new([column(&table, 2)], table);

        let field = projection.output_field(ColumnId(0)).unwrap();
        assert_eq!("c_name", field.name);
        assert_eq!(DataType::String, field.datatype);
        assert!(field.nullable);
    }
}
