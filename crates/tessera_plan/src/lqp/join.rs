use std::fmt;

use tessera_error::{Result, TesseraError};

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::comparison_expr::ComparisonOperator;
use crate::expr::Expression;

use super::constraints::{union_constraint_sets, UniqueConstraint};
use super::node::{ColumnId, LqpNode, LqpNodeRef, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinMode {
    Inner,
    Left,
    Right,
    FullOuter,
    Cross,
    Semi,
    AntiNullAsTrue,
    AntiNullAsFalse,
}

impl JoinMode {
    /// Semi and anti joins output the left input's columns only.
    pub const fn projects_left_only(&self) -> bool {
        matches!(self, Self::Semi | Self::AntiNullAsTrue | Self::AntiNullAsFalse)
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => write!(f, "Inner"),
            Self::Left => write!(f, "Left"),
            Self::Right => write!(f, "Right"),
            Self::FullOuter => write!(f, "FullOuter"),
            Self::Cross => write!(f, "Cross"),
            Self::Semi => write!(f, "Semi"),
            Self::AntiNullAsTrue => write!(f, "AntiNullAsTrue"),
            Self::AntiNullAsFalse => write!(f, "AntiNullAsFalse"),
        }
    }
}

/// Joins two inputs. Cross joins carry no predicates, every other mode
/// carries at least one.
#[derive(Debug)]
pub struct JoinNode {
    pub join_mode: JoinMode,
    pub join_predicates: Vec<Expression>,
}

impl JoinNode {
    pub fn new(
        join_mode: JoinMode,
        join_predicates: Vec<Expression>,
        left: LqpNodeRef,
        right: LqpNodeRef,
    ) -> Result<LqpNodeRef> {
        if join_mode == JoinMode::Cross && !join_predicates.is_empty() {
            return Err(TesseraError::invariant_violation(
                "cross join must not carry predicates",
            ));
        }
        if join_mode != JoinMode::Cross && join_predicates.is_empty() {
            return Err(TesseraError::invariant_violation(format!(
                "{join_mode} join requires at least one predicate"
            )));
        }

        Ok(LqpNode::build(
            NodeKind::Join(JoinNode {
                join_mode,
                join_predicates,
            }),
            Some(left),
            Some(right),
        ))
    }

    pub(crate) fn column_expressions(&self, node: &LqpNode) -> Result<Vec<Expression>> {
        let mut columns = node.left_input_required()?.column_expressions()?;
        if !self.join_mode.projects_left_only() {
            columns.append(&mut node.right_input_required()?.column_expressions()?);
        }
        Ok(columns)
    }

    /// Which input the output column at `column` comes from, and its
    /// position within that input.
    pub(crate) fn resolve_side(
        &self,
        node: &LqpNode,
        column: ColumnId,
    ) -> Result<(LqpNodeRef, ColumnId)> {
        let left = node.left_input_required()?;
        if self.join_mode.projects_left_only() {
            return Ok((left, column));
        }

        let left_count = left.column_expressions()?.len();
        if column.0 < left_count {
            Ok((left, column))
        } else {
            let right = node.right_input_required()?;
            Ok((right, ColumnId(column.0 - left_count)))
        }
    }

    pub(crate) fn is_column_nullable(&self, node: &LqpNode, column: ColumnId) -> Result<bool> {
        let left = node.left_input_required()?;
        if self.join_mode.projects_left_only() {
            return left.is_column_nullable(column);
        }

        let left_count = left.column_expressions()?.len();
        if column.0 < left_count {
            // Left-side columns are null-padded when the right side is
            // preserved.
            match self.join_mode {
                JoinMode::Right | JoinMode::FullOuter => Ok(true),
                _ => left.is_column_nullable(column),
            }
        } else {
            let right = node.right_input_required()?;
            let right_column = ColumnId(column.0 - left_count);
            match self.join_mode {
                JoinMode::Left | JoinMode::FullOuter => Ok(true),
                _ => right.is_column_nullable(right_column),
            }
        }
    }

    /// Constraint propagation across the join.
    ///
    /// Only a single bare-column equality predicate is reasoned about; every
    /// other shape conservatively drops all constraints. Uniqueness on one
    /// side prevents duplication of rows on the other; uniqueness on both
    /// sides makes the join 1:1, keeping both input key families keys of the
    /// output.
    pub(crate) fn constraints(&self, node: &LqpNode) -> Result<Vec<UniqueConstraint>> {
        let left = node.left_input_required()?;
        let right = node.right_input_required()?;

        match self.join_mode {
            // The output rows are a subset of the left input's rows.
            JoinMode::Semi => return left.constraints(),
            // ? Whether the anti modes may forward the left constraints like
            // semi does is unresolved; stay conservative until it is.
            JoinMode::AntiNullAsTrue | JoinMode::AntiNullAsFalse => return Ok(Vec::new()),
            JoinMode::Cross | JoinMode::FullOuter => return Ok(Vec::new()),
            // TODO: Forward the constraints of the preserved side.
            JoinMode::Left | JoinMode::Right => return Ok(Vec::new()),
            JoinMode::Inner => (),
        }

        let [predicate] = self.join_predicates.as_slice() else {
            return Ok(Vec::new());
        };
        let (a, b) = match predicate {
            Expression::Comparison(cmp) if cmp.op == ComparisonOperator::Eq => {
                match (cmp.left.as_ref(), cmp.right.as_ref()) {
                    (Expression::Column(a), Expression::Column(b)) => (a.clone(), b.clone()),
                    _ => return Ok(Vec::new()),
                }
            }
            _ => return Ok(Vec::new()),
        };

        // Orient the predicate as left_column = right_column.
        let (left_column, right_column) = if left.contains(a.node_id()) && right.contains(b.node_id())
        {
            (a, b)
        } else if left.contains(b.node_id()) && right.contains(a.node_id()) {
            (b, a)
        } else {
            return Ok(Vec::new());
        };

        let left_constraints = left.constraints()?;
        let right_constraints = right.constraints()?;

        let left_unique = left_constraints
            .iter()
            .any(|c| c.is_single_column(&Expression::Column(left_column.clone())));
        let right_unique = right_constraints
            .iter()
            .any(|c| c.is_single_column(&Expression::Column(right_column.clone())));

        Ok(match (left_unique, right_unique) {
            (true, true) => union_constraint_sets(left_constraints, right_constraints),
            (true, false) => right_constraints,
            (false, true) => left_constraints,
            (false, false) => Vec::new(),
        })
    }
}

impl Explainable for JoinNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        let mut ent = ExplainEntry::new("Join").with_value("mode", self.join_mode);
        if !self.join_predicates.is_empty() {
            ent = ent.with_values("predicates", &self.join_predicates);
        }
        ent
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_column::datatype::DataType;
    use tessera_column::field::Field;
    use tessera_error::ErrorKind;

    use super::*;
    use crate::catalog::TableEntry;
    use crate::explain::explainable::DescriptionMode;
    use crate::expr::column_expr::ColumnExpr;
    use crate::expr::comparison_expr::ComparisonExpr;
    use crate::lqp::stored_table::StoredTableNode;

    /// Three columns: `<name>_key` (Int, not null), `<name>_alt` (Int, not
    /// null), `<name>_payload` (String, nullable).
    fn table_with(name: &str, constraints: &[&[usize]]) -> LqpNodeRef {
        let mut entry = TableEntry::new(
            name,
            [
                Field::new(format!("{name}_key"), DataType::Int, false),
                Field::new(format!("{name}_alt"), DataType::Int, false),
                Field::new(format!("{name}_payload"), DataType::String, true),
            ],
            1000,
        );
        for constraint in constraints {
            entry = entry.with_unique_constraint(constraint.iter().copied());
        }
        StoredTableNode::new(Arc::new(entry))
    }

    fn column(node: &LqpNodeRef, idx: usize) -> Expression {
        Expression::Column(ColumnExpr::new(node, ColumnId(idx)))
    }

    fn equals(left: Expression, right: Expression) -> Expression {
        Expression::Comparison(
            ComparisonExpr::try_new(left, ComparisonOperator::Eq, right).unwrap(),
        )
    }

    fn single_constraint(node: &LqpNodeRef, idx: usize) -> UniqueConstraint {
        UniqueConstraint::new([column(node, idx)])
    }

    #[test]
    fn cross_join_with_predicate_rejected() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);
        let predicate = equals(column(&left, 0), column(&right, 0));

        let err = JoinNode::new(JoinMode::Cross, vec![predicate], left, right).unwrap_err();
        assert_eq!(ErrorKind::InvariantViolation, err.kind());
    }

    #[test]
    fn non_cross_join_without_predicate_rejected() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);

        let err = JoinNode::new(JoinMode::Inner, Vec::new(), left, right).unwrap_err();
        assert_eq!(ErrorKind::InvariantViolation, err.kind());
    }

    #[test]
    fn output_column_counts_per_mode() {
        for (mode, expected) in [
            (JoinMode::Inner, 6),
            (JoinMode::Left, 6),
            (JoinMode::Right, 6),
            (JoinMode::FullOuter, 6),
            (JoinMode::Semi, 3),
            (JoinMode::AntiNullAsTrue, 3),
            (JoinMode::AntiNullAsFalse, 3),
        ] {
            let left = table_with("l", &[]);
            let right = table_with("r", &[]);
            let join = JoinNode::new(
                mode,
                vec![equals(column(&left, 0), column(&right, 0))],
                left,
                right,
            )
            .unwrap();
            assert_eq!(expected, join.column_expressions().unwrap().len(), "{mode}");
        }
    }

    #[test]
    fn left_outer_join_nullability() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);
        let join = JoinNode::new(
            JoinMode::Left,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right,
        )
        .unwrap();

        // Left side keeps the input's nullability.
        assert!(!join.is_column_nullable(ColumnId(0)).unwrap());
        assert!(!join.is_column_nullable(ColumnId(1)).unwrap());
        assert!(join.is_column_nullable(ColumnId(2)).unwrap());
        // Right side is null-padded for unmatched left rows.
        for idx in 3..6 {
            assert!(join.is_column_nullable(ColumnId(idx)).unwrap());
        }
    }

    #[test]
    fn right_outer_join_nullability() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);
        let join = JoinNode::new(
            JoinMode::Right,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right,
        )
        .unwrap();

        for idx in 0..3 {
            assert!(join.is_column_nullable(ColumnId(idx)).unwrap());
        }
        assert!(!join.is_column_nullable(ColumnId(3)).unwrap());
    }

    #[test]
    fn semi_join_nullability_is_lefts() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);
        let join = JoinNode::new(
            JoinMode::Semi,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right,
        )
        .unwrap();

        assert!(!join.is_column_nullable(ColumnId(0)).unwrap());
        assert!(join.is_column_nullable(ColumnId(2)).unwrap());
    }

    #[test]
    fn inner_equi_join_both_sides_unique() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[0]]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&left, 0), column(&right, 0))],
            left.clone(),
            right.clone(),
        )
        .unwrap();

        assert_eq!(
            vec![single_constraint(&left, 0), single_constraint(&right, 0)],
            join.constraints().unwrap()
        );
    }

    #[test]
    fn inner_equi_join_left_side_unique() {
        // Right is keyed on a column that is not the join column, so its
        // constraint set is non-empty and must forward unchanged.
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[1]]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right.clone(),
        )
        .unwrap();

        assert_eq!(
            vec![single_constraint(&right, 1)],
            join.constraints().unwrap()
        );
    }

    #[test]
    fn inner_equi_join_right_side_unique() {
        let left = table_with("l", &[&[1]]);
        let right = table_with("r", &[&[0]]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&left, 0), column(&right, 0))],
            left.clone(),
            right,
        )
        .unwrap();

        assert_eq!(
            vec![single_constraint(&left, 1)],
            join.constraints().unwrap()
        );
    }

    #[test]
    fn inner_equi_join_neither_side_unique() {
        let left = table_with("l", &[&[1]]);
        let right = table_with("r", &[&[1]]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right,
        )
        .unwrap();

        assert!(join.constraints().unwrap().is_empty());
    }

    #[test]
    fn semi_join_forwards_left_constraints() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[]);
        let join = JoinNode::new(
            JoinMode::Semi,
            vec![equals(column(&left, 0), column(&right, 0))],
            left.clone(),
            right,
        )
        .unwrap();

        assert_eq!(left.constraints().unwrap(), join.constraints().unwrap());
    }

    #[test]
    fn multi_predicate_join_drops_constraints() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[0]]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![
                equals(column(&left, 0), column(&right, 0)),
                equals(column(&left, 1), column(&right, 1)),
            ],
            left,
            right,
        )
        .unwrap();

        assert!(join.constraints().unwrap().is_empty());
    }

    #[test]
    fn non_equals_predicate_drops_constraints() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[0]]);
        let predicate = Expression::Comparison(
            ComparisonExpr::try_new(column(&left, 0), ComparisonOperator::Lt, column(&right, 0))
                .unwrap(),
        );
        let join = JoinNode::new(JoinMode::Inner, vec![predicate], left, right).unwrap();

        assert!(join.constraints().unwrap().is_empty());
    }

    #[test]
    fn outer_and_anti_modes_drop_constraints() {
        for mode in [
            JoinMode::Left,
            JoinMode::Right,
            JoinMode::FullOuter,
            JoinMode::AntiNullAsTrue,
            JoinMode::AntiNullAsFalse,
        ] {
            let left = table_with("l", &[&[0]]);
            let right = table_with("r", &[&[0]]);
            let join = JoinNode::new(
                mode,
                vec![equals(column(&left, 0), column(&right, 0))],
                left,
                right,
            )
            .unwrap();
            assert!(join.constraints().unwrap().is_empty(), "{mode}");
        }
    }

    #[test]
    fn flipped_predicate_sides_still_orient() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[0]]);
        // Right column on the left side of the equality.
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&right, 0), column(&left, 0))],
            left.clone(),
            right.clone(),
        )
        .unwrap();

        assert_eq!(
            vec![single_constraint(&left, 0), single_constraint(&right, 0)],
            join.constraints().unwrap()
        );
    }

    #[test]
    fn cross_join_basics() {
        let left = table_with("l", &[&[0]]);
        let right = table_with("r", &[&[0]]);
        let join = JoinNode::new(JoinMode::Cross, Vec::new(), left, right).unwrap();

        assert_eq!("[Join] mode: Cross", join.description(DescriptionMode::Short));
        assert_eq!(6, join.column_expressions().unwrap().len());
        assert!(join.constraints().unwrap().is_empty());
    }

    #[test]
    fn join_description_includes_predicates() {
        let left = table_with("l", &[]);
        let right = table_with("r", &[]);
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![equals(column(&left, 0), column(&right, 0))],
            left,
            right,
        )
        .unwrap();

        assert_eq!(
            "[Join] mode: Inner [l_key = r_key]",
            join.description(DescriptionMode::Short)
        );
    }
}
