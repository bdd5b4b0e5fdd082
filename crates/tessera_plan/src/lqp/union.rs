use tessera_error::{Result, TesseraError};

use crate::explain::explainable::{ExplainConfig, ExplainEntry, Explainable};

use super::node::{ColumnId, LqpNode, LqpNodeRef, NodeKind};

/// Positional union of two inputs.
///
/// The output schema is the left input's; per position, a column is nullable
/// if it is nullable in either input. Constraints are dropped since the
/// union may introduce duplicates.
#[derive(Debug)]
pub struct UnionNode {
    pub all: bool,
}

impl UnionNode {
    pub fn new(all: bool, left: LqpNodeRef, right: LqpNodeRef) -> Result<LqpNodeRef> {
        let left_count = left.column_expressions()?.len();
        let right_count = right.column_expressions()?.len();
        if left_count != right_count {
            return Err(TesseraError::invariant_violation(format!(
                "union inputs must have the same column count, got {left_count} and {right_count}"
            )));
        }

        for idx in 0..left_count {
            let left_type = left.output_field(ColumnId(idx))?.datatype;
            let right_type = right.output_field(ColumnId(idx))?.datatype;
            if !left_type.is_compatible_with(&right_type) {
                return Err(TesseraError::incompatible_types(format!(
                    "union column {idx} combines {left_type} with {right_type}"
                )));
            }
        }

        Ok(LqpNode::build(
            NodeKind::Union(UnionNode { all }),
            Some(left),
            Some(right),
        ))
    }
}

impl Explainable for UnionNode {
    fn explain_entry(&self, _conf: ExplainConfig) -> ExplainEntry {
        ExplainEntry::new("Union").with_value("mode", if self.all { "All" } else { "Distinct" })
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

    fn table(name: &str, nullable_first: bool) -> LqpNodeRef {
        crate::lqp::stored_table::StoredTableNode::new(Arc::new(
            TableEntry::new(
                name,
                [
                    Field::new("key", DataType::Int, nullable_first),
                    Field::new("name", DataType::String, false),
                ],
                100,
            )
            .with_unique_constraint([0]),
        ))
    }

    #[test]
    fn mismatched_column_counts_rejected() {
        let left = table("a", false);
        let right = crate::lqp::stored_table::StoredTableNode::new(Arc::new(TableEntry::new(
            "b",
            [Field::new("key", DataType::Int, false)],
            100,
        )));

        let err = UnionNode::new(true, left, right).unwrap_err();
        assert_eq!(ErrorKind::InvariantViolation, err.kind());
    }

    #[test]
    fn incompatible_column_types_rejected() {
        let left = table("a", false);
        let right = crate::lqp::stored_table::StoredTableNode::new(Arc::new(TableEntry::new(
            "b",
            [
                Field::new("key", DataType::String, false),
                Field::new("name", DataType::String, false),
            ],
            100,
        )));

        let err = UnionNode::new(true, left, right).unwrap_err();
        assert_eq!(ErrorKind::IncompatibleTypes, err.kind());
    }

    #[test]
    fn nullability_is_or_of_inputs() {
        let left = table("a", false);
        let right = table("b", true);
        let union = UnionNode::new(true, left, right).unwrap();

        // Nullable in the right input only.
        assert!(union.is_column_nullable(ColumnId(0)).unwrap());
        assert!(!union.is_column_nullable(ColumnId(1)).unwrap());
    }

    #[test]
    fn constraints_are_dropped() {
        let left = table("a", false);
        let right = table("b", false);
        let union = UnionNode::new(true, left.clone(), right).unwrap();

        assert!(!left.constraints().unwrap().is_empty());
        assert!(union.constraints().unwrap().is_empty());
    }

    #[test]
    fn columns_are_positional_from_the_left() {
        let left = table("a", false);
        let right = table("b", false);
        let union = UnionNode::new(true, left.clone(), right).unwrap();

        assert_eq!(
            left.column_expressions().unwrap(),
            union.column_expressions().unwrap()
        );
        assert_eq!("[Union] mode: All", union.description(DescriptionMode::Short));
    }
}
