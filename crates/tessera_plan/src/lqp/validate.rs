use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};

use super::node::{LqpNode, LqpNodeRef, NodeKind};

/// Filters rows down to those visible to the current transaction. Schema,
/// nullability and constraints pass through.
#[derive(Debug)]
pub struct ValidateNode;

impl ValidateNode {
    pub fn new(input: LqpNodeRef) -> LqpNodeRef {
        LqpNode::build(NodeKind::Validate(ValidateNode), Some(input), None)
    }
}

impl Explainable for ValidateNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        ExplainEntry::new("Validate")
    }
}
