use std::sync::Arc;

use tessera_error::Result;

use crate::catalog::TableEntry;
use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::expr::column_expr::ColumnExpr;
use crate::expr::Expression;

use super::constraints::UniqueConstraint;
use super::node::{ColumnId, LqpNode, LqpNodeRef, NodeKind};

/// Leaf node scanning a catalog table.
///
/// Columns, nullability and declared unique constraints pass through from
/// the catalog verbatim.
#[derive(Debug)]
pub struct StoredTableNode {
    pub table: Arc<TableEntry>,
}

impl StoredTableNode {
    pub fn new(table: Arc<TableEntry>) -> LqpNodeRef {
        LqpNode::build(NodeKind::StoredTable(StoredTableNode { table }), None, None)
    }

    pub(crate) fn column_expressions(&self, node: &LqpNode) -> Result<Vec<Expression>> {
        let this = node.this();
        Ok((0..self.table.columns.len())
            .map(|idx| Expression::Column(ColumnExpr::new(&this, ColumnId(idx))))
            .collect())
    }

    pub(crate) fn constraints(&self, node: &LqpNode) -> Result<Vec<UniqueConstraint>> {
        let this = node.this();
        Ok(self
            .table
            .unique_constraints
            .iter()
            .map(|constraint| {
                UniqueConstraint::new(constraint.columns.iter().map(|&idx| {
                    Expression::Column(ColumnExpr::new(&this, ColumnId(idx)))
                }))
            })
            .collect())
    }
}

impl Explainable for StoredTableNode {
    fn explain_entry(&self, conf: ExplainConfig) -> ExplainEntry {
        let mut ent = ExplainEntry::new("StoredTable").with_value("table", &self.table.name);
        if conf.verbose {
            ent = ent.with_values(
                "columns",
                self.table
                    .columns
                    .iter()
                    .map(|c| format!("{} {}", c.name, c.datatype)),
            );
        }
        ent
    }
}

#[cfg(test)]
mod tests {
    use tessera_column::datatype::DataType;
    use tessera_column::field::Field;
    use tessera_error::ErrorKind;

    use super::*;

    fn parts() -> LqpNodeRef {
        StoredTableNode::new(Arc::new(
            TableEntry::new(
                "parts",
                [
                    Field::new("p_id", DataType::Int, false),
                    Field::new("p_name", DataType::String, true),
                ],
                400,
            )
            .with_unique_constraint([0]),
        ))
    }

    #[test]
    fn column_expressions_reference_the_leaf() {
        let table = parts();
        let columns = table.column_expressions().unwrap();
        assert_eq!(2, columns.len());

        for (idx, expr) in columns.iter().enumerate() {
            match expr {
                Expression::Column(col) => {
                    assert_eq!(ColumnId(idx), col.column);
                    assert!(Arc::ptr_eq(&col.owner().unwrap(), &table));
                }
                other => panic!("unexpected expression {other:?}"),
            }
        }
    }

    #[test]
    fn catalog_metadata_passes_through() {
        let table = parts();
        assert!(!table.is_column_nullable(ColumnId(0)).unwrap());
        assert!(table.is_column_nullable(ColumnId(1)).unwrap());
        assert_eq!(
            ErrorKind::UnknownColumn,
            table.is_column_nullable(ColumnId(2)).unwrap_err().kind()
        );

        let constraints = table.constraints().unwrap();
        assert_eq!(1, constraints.len());
        assert_eq!(
            vec![table.column_expressions().unwrap()[0].clone()],
            constraints[0].column_expressions
        );
    }
}
