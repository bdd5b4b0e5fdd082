use std::fmt;

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::Expression;

use super::node::{LqpNode, LqpNodeRef, NodeKind};

#[derive(Debug, Clone, PartialEq, Hash)]
pub struct OrderByExpr {
    pub expr: Expression,
    pub desc: bool,
    pub nulls_first: bool,
}

impl fmt::Display for OrderByExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.expr,
            if self.desc { "DESC" } else { "ASC" },
            if self.nulls_first {
                "NULLS FIRST"
            } else {
                "NULLS LAST"
            }
        )
    }
}

/// Reorders rows. Schema, nullability and constraints pass through.
#[derive(Debug)]
pub struct SortNode {
    pub expressions: Vec<OrderByExpr>,
}

impl SortNode {
    pub fn new(expressions: impl IntoIterator<Item = OrderByExpr>, input: LqpNodeRef) -> LqpNodeRef {
        LqpNode::build(
            NodeKind::Sort(SortNode {
                expressions: expressions.into_iter().collect(),
            }),
            Some(input),
            None,
        )
    }
}

impl Explainable for SortNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        ExplainEntry::new("Sort").with_values("expressions", &self.expressions)
    }
}
