use std::fmt;

use fmtutil::IntoDisplayableSlice;

use crate::expr::Expression;

/// A set of column expressions declared to form a key of the relation at
/// some point in the plan.
#[derive(Debug, Clone)]
pub struct UniqueConstraint {
    pub column_expressions: Vec<Expression>,
}

impl UniqueConstraint {
    pub fn new(column_expressions: impl IntoIterator<Item = Expression>) -> Self {
        UniqueConstraint {
            column_expressions: column_expressions.into_iter().collect(),
        }
    }

    /// Whether this constraint covers exactly the given single expression.
    pub fn is_single_column(&self, expr: &Expression) -> bool {
        matches!(self.column_expressions.as_slice(), [only] if only == expr)
    }

    /// Whether every column of this constraint appears verbatim in `exprs`.
    pub fn all_columns_in(&self, exprs: &[Expression]) -> bool {
        self.column_expressions.iter().all(|c| exprs.contains(c))
    }
}

/// Set semantics: column order within a constraint does not matter.
impl PartialEq for UniqueConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.column_expressions.len() == other.column_expressions.len()
            && self
                .column_expressions
                .iter()
                .all(|c| other.column_expressions.contains(c))
    }
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UNIQUE {}", self.column_expressions.display_with_brackets())
    }
}

pub fn constraint_set_contains(set: &[UniqueConstraint], constraint: &UniqueConstraint) -> bool {
    set.contains(constraint)
}

/// Union of two constraint sets, deduplicated under set equality.
pub fn union_constraint_sets(
    mut left: Vec<UniqueConstraint>,
    right: Vec<UniqueConstraint>,
) -> Vec<UniqueConstraint> {
    for constraint in right {
        if !left.contains(&constraint) {
            left.push(constraint);
        }
    }
    left
}
