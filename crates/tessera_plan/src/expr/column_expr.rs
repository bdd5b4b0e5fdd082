use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Weak;

use tessera_column::datatype::DataType;
use tessera_error::{Result, TesseraError};

use crate::lqp::node::{ColumnId, LqpNode, LqpNodeRef, NodeId};

/// Reference to a column output by a specific plan node.
///
/// Identity is `(owning node identity, column index)`. The handle to the
/// owning node is weak; the plan's input edges own the node, the reference
/// only names it. Callers keep the referenced node alive for as long as the
/// expression is in use.
#[derive(Debug, Clone)]
pub struct ColumnExpr {
    node: Weak<LqpNode>,
    pub column: ColumnId,
}

impl ColumnExpr {
    pub fn new(node: &LqpNodeRef, column: ColumnId) -> Self {
        ColumnExpr {
            node: LqpNodeRef::downgrade(node),
            column,
        }
    }

    /// Identity of the owning node, valid even after the node is released.
    pub fn node_id(&self) -> NodeId {
        NodeId::of_weak(&self.node)
    }

    /// Resolve the owning node.
    pub fn owner(&self) -> Result<LqpNodeRef> {
        self.node.upgrade().ok_or_else(|| {
            TesseraError::unknown_column(format!(
                "column {} references a released node",
                self.column
            ))
        })
    }

    pub fn datatype(&self) -> Result<DataType> {
        Ok(self.owner()?.output_field(self.column)?.datatype)
    }

    pub fn is_nullable(&self) -> Result<bool> {
        self.owner()?.is_column_nullable(self.column)
    }
}

impl PartialEq for ColumnExpr {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.node, &other.node) && self.column == other.column
    }
}

impl Hash for ColumnExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_id().hash(state);
        self.column.hash(state);
    }
}

impl fmt::Display for ColumnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self
            .node
            .upgrade()
            .and_then(|node| node.output_field(self.column).ok())
        {
            Some(field) => write!(f, "{}", field.name),
            None => write!(f, "#{}", self.column),
        }
    }
}
