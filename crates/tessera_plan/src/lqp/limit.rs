use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};

use super::node::{LqpNode, LqpNodeRef, NodeKind};

/// Keeps at most `limit` rows, skipping `offset` first.
#[derive(Debug)]
pub struct LimitNode {
    pub limit: usize,
    pub offset: Option<usize>,
}

impl LimitNode {
    pub fn new(limit: usize, offset: Option<usize>, input: LqpNodeRef) -> LqpNodeRef {
        LqpNode::build(
            NodeKind::Limit(LimitNode { limit, offset }),
            Some(input),
            None,
        )
    }
}

impl Explainable for LimitNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        let mut ent = ExplainEntry::new("Limit").with_value("limit", self.limit);
        if let Some(offset) = self.offset {
            ent = ent.with_value("offset", offset);
        }
        ent
    }
}
