use fmtutil::IntoDisplayableSlice;
use tessera_error::{Result, TesseraError};

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::aggregate_expr::AggregateFunction;
use crate::expr::Expression;

use super::constraints::UniqueConstraint;
use super::node::{ColumnId, LqpNode, LqpNodeRef, NodeKind};

/// Groups the input and computes aggregates per group.
///
/// Output columns are the group-by columns followed by the aggregate
/// expressions.
#[derive(Debug)]
pub struct AggregateNode {
    pub group_by: Vec<Expression>,
    pub aggregates: Vec<Expression>,
}

impl AggregateNode {
    pub fn new(
        group_by: impl IntoIterator<Item = Expression>,
        aggregates: impl IntoIterator<Item = Expression>,
        input: LqpNodeRef,
    ) -> LqpNodeRef {
        LqpNode::build(
            NodeKind::Aggregate(AggregateNode {
                group_by: group_by.into_iter().collect(),
                aggregates: aggregates.into_iter().collect(),
            }),
            Some(input),
            None,
        )
    }

    pub(crate) fn output_expression(&self, column: ColumnId) -> Result<&Expression> {
        self.group_by
            .iter()
            .chain(self.aggregates.iter())
            .nth(column.0)
            .ok_or_else(|| {
                TesseraError::unknown_column(format!(
                    "no aggregate output at index {column} ({} group-by, {} aggregates)",
                    self.group_by.len(),
                    self.aggregates.len()
                ))
            })
    }

    pub(crate) fn is_column_nullable(&self, column: ColumnId) -> Result<bool> {
        if column.0 < self.group_by.len() {
            return self.group_by[column.0].is_nullable();
        }

        let expr = self.output_expression(column)?;
        match expr {
            // COUNT is never null. The others produce a NULL row when the
            // whole input is empty, which a GROUP BY rules out: no rows, no
            // groups.
            Expression::Aggregate(agg) => match agg.agg {
                AggregateFunction::Count => Ok(false),
                _ if self.group_by.is_empty() => Ok(true),
                _ => agg.input.is_nullable(),
            },
            other => other.is_nullable(),
        }
    }

    /// The group-by columns key the output. Input constraints survive when
    /// all of their columns are grouped on: each surviving key value then
    /// identifies at most one group.
    pub(crate) fn constraints(&self, node: &LqpNode) -> Result<Vec<UniqueConstraint>> {
        let input = node.left_input_required()?;
        let mut constraints: Vec<_> = input
            .constraints()?
            .into_iter()
            .filter(|constraint| constraint.all_columns_in(&self.group_by))
            .collect();

        if !self.group_by.is_empty() {
            let group_constraint = UniqueConstraint::new(self.group_by.clone());
            if !constraints.contains(&group_constraint) {
                constraints.push(group_constraint);
            }
        }

        Ok(constraints)
    }
}

impl Explainable for AggregateNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        ExplainEntry::new("Aggregate")
            .with_value("group_by", self.group_by.display_with_brackets())
            .with_value("aggregates", self.aggregates.display_with_brackets())
    }
}
