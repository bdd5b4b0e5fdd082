use std::fmt;

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::Expression;

use super::node::{LqpNode, LqpNodeRef, NodeKind};

/// How the physical layer should evaluate the predicate. A label only at
/// this layer, like the encoding tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanType {
    TableScan,
    IndexScan,
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableScan => write!(f, "TableScan"),
            Self::IndexScan => write!(f, "IndexScan"),
        }
    }
}

/// Filters rows by a predicate. The column schema is untouched.
#[derive(Debug)]
pub struct PredicateNode {
    pub predicate: Expression,
    pub scan_type: ScanType,
}

impl PredicateNode {
    pub fn new(predicate: Expression, input: LqpNodeRef) -> LqpNodeRef {
        Self::with_scan_type(predicate, ScanType::TableScan, input)
    }

    pub fn with_scan_type(
        predicate: Expression,
        scan_type: ScanType,
        input: LqpNodeRef,
    ) -> LqpNodeRef {
        LqpNode::build(
            NodeKind::Predicate(PredicateNode {
                predicate,
                scan_type,
            }),
            Some(input),
            None,
        )
    }
}

impl Explainable for PredicateNode {
    fn explain_entry(&self, conf: ExplainConfig) -> ExplainEntry {
        let mut ent = ExplainEntry::new("Predicate");
        if self.scan_type != ScanType::TableScan || conf.verbose {
            ent = ent.with_value("scan_type", self.scan_type);
        }
        ent.with_values("predicate", [&self.predicate])
    }
}
