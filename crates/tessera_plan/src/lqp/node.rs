use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tessera_column::field::Field;
use tessera_error::{Result, TesseraError};
use tracing::trace;

use crate::explain::explainable::{DescriptionMode, ExplainConfig, ExplainEntry, Explainable};
use crate::expr::Expression;

use super::aggregate::AggregateNode;
use super::constraints::UniqueConstraint;
use super::join::JoinNode;
use super::limit::LimitNode;
use super::predicate::PredicateNode;
use super::projection::ProjectionNode;
use super::sort::SortNode;
use super::stored_table::StoredTableNode;
use super::union::UnionNode;
use super::validate::ValidateNode;

/// Shared handle to a plan node. Sub-plans may be shared: one node can be the
/// input of several parents.
pub type LqpNodeRef = Arc<LqpNode>;

/// Index of a column within a node's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnId(pub usize);

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a plan node. Two structurally equal nodes are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn of(node: &LqpNodeRef) -> Self {
        NodeId(Arc::as_ptr(node) as usize)
    }

    pub(crate) fn of_weak(node: &Weak<LqpNode>) -> Self {
        NodeId(Weak::as_ptr(node) as usize)
    }
}

/// Maps original node identities to their copies during structural copies.
pub type NodeMapping = HashMap<NodeId, LqpNodeRef, ahash::RandomState>;

static HASH_STATE: Lazy<ahash::RandomState> = Lazy::new(ahash::RandomState::new);

#[derive(Debug)]
pub enum NodeKind {
    StoredTable(StoredTableNode),
    Predicate(PredicateNode),
    Projection(ProjectionNode),
    Join(JoinNode),
    Aggregate(AggregateNode),
    Sort(SortNode),
    Limit(LimitNode),
    Union(UnionNode),
    Validate(ValidateNode),
}

/// A vertex of the logical query plan.
///
/// Nodes are built bottom-up through the per-kind factories and published as
/// `LqpNodeRef`s. Inputs must not be rewired once the plan has been handed to
/// a consumer that may read it concurrently.
#[derive(Debug)]
pub struct LqpNode {
    pub kind: NodeKind,
    left: RwLock<Option<LqpNodeRef>>,
    right: RwLock<Option<LqpNodeRef>>,
    this: Weak<LqpNode>,
}

impl LqpNode {
    pub(crate) fn build(
        kind: NodeKind,
        left: Option<LqpNodeRef>,
        right: Option<LqpNodeRef>,
    ) -> LqpNodeRef {
        Arc::new_cyclic(|this| LqpNode {
            kind,
            left: RwLock::new(left),
            right: RwLock::new(right),
            this: this.clone(),
        })
    }

    /// Identity of this node.
    pub fn id(&self) -> NodeId {
        NodeId(self as *const LqpNode as usize)
    }

    /// Strong handle to this node.
    pub(crate) fn this(&self) -> LqpNodeRef {
        self.this
            .upgrade()
            .expect("node is alive while we hold a reference to it")
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::StoredTable(_) => "StoredTable",
            NodeKind::Predicate(_) => "Predicate",
            NodeKind::Projection(_) => "Projection",
            NodeKind::Join(_) => "Join",
            NodeKind::Aggregate(_) => "Aggregate",
            NodeKind::Sort(_) => "Sort",
            NodeKind::Limit(_) => "Limit",
            NodeKind::Union(_) => "Union",
            NodeKind::Validate(_) => "Validate",
        }
    }

    pub fn left_input(&self) -> Option<LqpNodeRef> {
        self.left.read().clone()
    }

    pub fn right_input(&self) -> Option<LqpNodeRef> {
        self.right.read().clone()
    }

    pub fn inputs(&self) -> (Option<LqpNodeRef>, Option<LqpNodeRef>) {
        (self.left_input(), self.right_input())
    }

    pub fn set_left_input(&self, input: Option<LqpNodeRef>) {
        *self.left.write() = input;
    }

    pub fn set_right_input(&self, input: Option<LqpNodeRef>) {
        *self.right.write() = input;
    }

    pub(crate) fn left_input_required(&self) -> Result<LqpNodeRef> {
        self.left_input().ok_or_else(|| {
            TesseraError::invariant_violation(format!(
                "{} node is missing its left input",
                self.kind_name()
            ))
        })
    }

    pub(crate) fn right_input_required(&self) -> Result<LqpNodeRef> {
        self.right_input().ok_or_else(|| {
            TesseraError::invariant_violation(format!(
                "{} node is missing its right input",
                self.kind_name()
            ))
        })
    }

    /// The expressions attached to this node: predicates for predicate and
    /// join nodes, the projection list, group-by plus aggregates, order-by
    /// expressions. Leaves and row-slicing nodes have none.
    pub fn node_expressions(&self) -> Vec<Expression> {
        match &self.kind {
            NodeKind::StoredTable(_) => Vec::new(),
            NodeKind::Predicate(n) => vec![n.predicate.clone()],
            NodeKind::Projection(n) => n.expressions.clone(),
            NodeKind::Join(n) => n.join_predicates.clone(),
            NodeKind::Aggregate(n) => n
                .group_by
                .iter()
                .chain(n.aggregates.iter())
                .cloned()
                .collect(),
            NodeKind::Sort(n) => n.expressions.iter().map(|o| o.expr.clone()).collect(),
            NodeKind::Limit(_) => Vec::new(),
            NodeKind::Union(_) => Vec::new(),
            NodeKind::Validate(_) => Vec::new(),
        }
    }

    /// One expression per output column of this node.
    ///
    /// Recomputed from the live inputs on every call. Caching would require
    /// change propagation through every parent whenever an input is rewired;
    /// the recomputation is cheap enough that we deliberately don't.
    pub fn column_expressions(&self) -> Result<Vec<Expression>> {
        match &self.kind {
            NodeKind::StoredTable(n) => n.column_expressions(self),
            NodeKind::Predicate(_)
            | NodeKind::Sort(_)
            | NodeKind::Limit(_)
            | NodeKind::Validate(_)
            | NodeKind::Union(_) => self.left_input_required()?.column_expressions(),
            NodeKind::Projection(n) => Ok(n.expressions.clone()),
            NodeKind::Aggregate(n) => Ok(n
                .group_by
                .iter()
                .chain(n.aggregates.iter())
                .cloned()
                .collect()),
            NodeKind::Join(n) => n.column_expressions(self),
        }
    }

    /// Whether the column at the given position may contain NULLs.
    pub fn is_column_nullable(&self, column: ColumnId) -> Result<bool> {
        match &self.kind {
            NodeKind::StoredTable(n) => Ok(n.table.column(column.0)?.nullable),
            NodeKind::Predicate(_)
            | NodeKind::Sort(_)
            | NodeKind::Limit(_)
            | NodeKind::Validate(_) => self.left_input_required()?.is_column_nullable(column),
            NodeKind::Projection(n) => n.output_expression(column)?.is_nullable(),
            NodeKind::Aggregate(n) => n.is_column_nullable(column),
            NodeKind::Union(_) => {
                let left = self.left_input_required()?;
                let right = self.right_input_required()?;
                Ok(left.is_column_nullable(column)? || right.is_column_nullable(column)?)
            }
            NodeKind::Join(n) => n.is_column_nullable(self, column),
        }
    }

    /// Name and type of the column at the given position.
    pub fn output_field(&self, column: ColumnId) -> Result<Field> {
        let nullable = self.is_column_nullable(column)?;
        let (name, datatype) = match &self.kind {
            NodeKind::StoredTable(n) => {
                let field = n.table.column(column.0)?;
                (field.name.clone(), field.datatype)
            }
            NodeKind::Predicate(_)
            | NodeKind::Sort(_)
            | NodeKind::Limit(_)
            | NodeKind::Validate(_)
            | NodeKind::Union(_) => {
                let field = self.left_input_required()?.output_field(column)?;
                (field.name, field.datatype)
            }
            NodeKind::Projection(n) => {
                let expr = n.output_expression(column)?;
                (expr.to_string(), expr.datatype()?)
            }
            NodeKind::Aggregate(n) => {
                let expr = n.output_expression(column)?;
                (expr.to_string(), expr.datatype()?)
            }
            NodeKind::Join(n) => {
                let (side, side_column) = n.resolve_side(self, column)?;
                let field = side.output_field(side_column)?;
                (field.name, field.datatype)
            }
        };
        Ok(Field::new(name, datatype, nullable))
    }

    /// The unique constraints that hold for this node's output.
    pub fn constraints(&self) -> Result<Vec<UniqueConstraint>> {
        match &self.kind {
            NodeKind::StoredTable(n) => n.constraints(self),
            NodeKind::Projection(n) => n.constraints(self),
            NodeKind::Aggregate(n) => n.constraints(self),
            NodeKind::Join(n) => n.constraints(self),
            // Duplicates may be introduced, all bets are off.
            NodeKind::Union(_) => Ok(Vec::new()),
            // Row filtering and reordering can only shrink the relation.
            NodeKind::Predicate(_)
            | NodeKind::Sort(_)
            | NodeKind::Limit(_)
            | NodeKind::Validate(_) => self.forward_constraints(),
        }
    }

    /// Default constraint derivation: the union of the input constraint sets,
    /// unchanged.
    pub fn forward_constraints(&self) -> Result<Vec<UniqueConstraint>> {
        let mut constraints = self.left_input_required()?.constraints()?;
        if let Some(right) = self.right_input() {
            constraints = super::constraints::union_constraint_sets(constraints, right.constraints()?);
        }
        Ok(constraints)
    }

    pub fn description(&self, mode: DescriptionMode) -> String {
        self.explain_entry(mode.config()).to_string()
    }

    /// Copy this node without copying its inputs.
    ///
    /// The copy's expressions are rewritten through `mapping`, the original
    /// node's identity is recorded in `mapping`, and the copy's inputs are
    /// left unset for the caller to wire.
    pub fn shallow_copy(&self, mapping: &mut NodeMapping) -> LqpNodeRef {
        let kind = match &self.kind {
            NodeKind::StoredTable(n) => NodeKind::StoredTable(StoredTableNode {
                table: n.table.clone(),
            }),
            NodeKind::Predicate(n) => NodeKind::Predicate(PredicateNode {
                predicate: n.predicate.deep_copy(mapping),
                scan_type: n.scan_type,
            }),
            NodeKind::Projection(n) => NodeKind::Projection(ProjectionNode {
                expressions: n.expressions.iter().map(|e| e.deep_copy(mapping)).collect(),
            }),
            NodeKind::Join(n) => NodeKind::Join(JoinNode {
                join_mode: n.join_mode,
                join_predicates: n
                    .join_predicates
                    .iter()
                    .map(|e| e.deep_copy(mapping))
                    .collect(),
            }),
            NodeKind::Aggregate(n) => NodeKind::Aggregate(AggregateNode {
                group_by: n.group_by.iter().map(|e| e.deep_copy(mapping)).collect(),
                aggregates: n.aggregates.iter().map(|e| e.deep_copy(mapping)).collect(),
            }),
            NodeKind::Sort(n) => NodeKind::Sort(SortNode {
                expressions: n
                    .expressions
                    .iter()
                    .map(|o| super::sort::OrderByExpr {
                        expr: o.expr.deep_copy(mapping),
                        desc: o.desc,
                        nulls_first: o.nulls_first,
                    })
                    .collect(),
            }),
            NodeKind::Limit(n) => NodeKind::Limit(LimitNode {
                limit: n.limit,
                offset: n.offset,
            }),
            NodeKind::Union(n) => NodeKind::Union(UnionNode { all: n.all }),
            NodeKind::Validate(_) => NodeKind::Validate(ValidateNode),
        };

        let copy = LqpNode::build(kind, None, None);
        mapping.insert(self.id(), copy.clone());
        copy
    }

    /// Structural equality up to a node-identity mapping on column
    /// references. Inputs are not compared.
    pub fn shallow_equals(&self, other: &LqpNode, mapping: &NodeMapping) -> bool {
        fn exprs_eq(a: &[Expression], b: &[Expression], mapping: &NodeMapping) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(x, y)| x.eq_with_mapping(y, mapping))
        }

        match (&self.kind, &other.kind) {
            (NodeKind::StoredTable(a), NodeKind::StoredTable(b)) => Arc::ptr_eq(&a.table, &b.table),
            (NodeKind::Predicate(a), NodeKind::Predicate(b)) => {
                a.scan_type == b.scan_type
                    && a.predicate.eq_with_mapping(&b.predicate, mapping)
            }
            (NodeKind::Projection(a), NodeKind::Projection(b)) => {
                exprs_eq(&a.expressions, &b.expressions, mapping)
            }
            (NodeKind::Join(a), NodeKind::Join(b)) => {
                a.join_mode == b.join_mode
                    && exprs_eq(&a.join_predicates, &b.join_predicates, mapping)
            }
            (NodeKind::Aggregate(a), NodeKind::Aggregate(b)) => {
                exprs_eq(&a.group_by, &b.group_by, mapping)
                    && exprs_eq(&a.aggregates, &b.aggregates, mapping)
            }
            (NodeKind::Sort(a), NodeKind::Sort(b)) => {
                a.expressions.len() == b.expressions.len()
                    && a.expressions.iter().zip(b.expressions.iter()).all(|(x, y)| {
                        x.desc == y.desc
                            && x.nulls_first == y.nulls_first
                            && x.expr.eq_with_mapping(&y.expr, mapping)
                    })
            }
            (NodeKind::Limit(a), NodeKind::Limit(b)) => a.limit == b.limit && a.offset == b.offset,
            (NodeKind::Union(a), NodeKind::Union(b)) => a.all == b.all,
            (NodeKind::Validate(_), NodeKind::Validate(_)) => true,
            _ => false,
        }
    }

    /// Hash of the node's kind, kind-specific scalars and expressions.
    /// Inputs are not hashed.
    pub fn shallow_hash(&self) -> u64 {
        let mut hasher = HASH_STATE.build_hasher();
        std::mem::discriminant(&self.kind).hash(&mut hasher);

        match &self.kind {
            NodeKind::StoredTable(n) => n.table.name.hash(&mut hasher),
            NodeKind::Predicate(n) => {
                n.scan_type.hash(&mut hasher);
                n.predicate.hash(&mut hasher);
            }
            NodeKind::Projection(n) => n.expressions.hash(&mut hasher),
            NodeKind::Join(n) => {
                n.join_mode.hash(&mut hasher);
                n.join_predicates.hash(&mut hasher);
            }
            NodeKind::Aggregate(n) => {
                n.group_by.hash(&mut hasher);
                n.aggregates.hash(&mut hasher);
            }
            NodeKind::Sort(n) => {
                for order_by in &n.expressions {
                    order_by.expr.hash(&mut hasher);
                    order_by.desc.hash(&mut hasher);
                    order_by.nulls_first.hash(&mut hasher);
                }
            }
            NodeKind::Limit(n) => {
                n.limit.hash(&mut hasher);
                n.offset.hash(&mut hasher);
            }
            NodeKind::Union(n) => n.all.hash(&mut hasher),
            NodeKind::Validate(_) => {}
        }

        hasher.finish()
    }

    /// Visit every node reachable through inputs, each exactly once.
    ///
    /// Iterative so deeply nested plans don't exhaust the stack.
    pub fn for_each_node<F>(self: &Arc<Self>, f: &mut F)
    where
        F: FnMut(&LqpNodeRef),
    {
        let mut stack = vec![self.clone()];
        let mut seen: HashSet<NodeId, ahash::RandomState> = HashSet::default();

        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) {
                continue;
            }
            f(&node);
            if let Some(left) = node.left_input() {
                stack.push(left);
            }
            if let Some(right) = node.right_input() {
                stack.push(right);
            }
        }
    }

    /// Whether a node with the given identity is reachable from this node.
    pub fn contains(self: &Arc<Self>, id: NodeId) -> bool {
        let mut found = false;
        self.for_each_node(&mut |node| found = found || node.id() == id);
        found
    }

    /// Check that every column reference in the reachable sub-plan points at
    /// a node that is itself reachable.
    pub fn validate(self: &Arc<Self>) -> Result<()> {
        let mut reachable: HashSet<NodeId, ahash::RandomState> = HashSet::default();
        let mut nodes = Vec::new();
        self.for_each_node(&mut |node| {
            reachable.insert(node.id());
            nodes.push(node.clone());
        });

        for node in nodes {
            for expr in node.node_expressions() {
                expr.for_each_column(&mut |col| {
                    let owner = col.owner()?;
                    if !reachable.contains(&NodeId::of(&owner)) {
                        return Err(TesseraError::unknown_column(format!(
                            "column {col} of {} node references a node outside the plan",
                            node.kind_name()
                        )));
                    }
                    Ok(())
                })?;
            }
        }

        Ok(())
    }

    /// Copy the whole reachable plan.
    ///
    /// Sharing is preserved: a node that is the input of several parents is
    /// copied once and re-wired into all of them.
    pub fn deep_copy(self: &Arc<Self>) -> LqpNodeRef {
        let mut mapping = NodeMapping::default();
        self.deep_copy_with_mapping(&mut mapping)
    }

    pub fn deep_copy_with_mapping(self: &Arc<Self>, mapping: &mut NodeMapping) -> LqpNodeRef {
        trace!(root = self.kind_name(), "deep copying plan");

        // Post-order: inputs land in the mapping before the parents whose
        // expressions reference them.
        let mut stack: Vec<(LqpNodeRef, bool)> = vec![(self.clone(), false)];
        while let Some((node, expanded)) = stack.pop() {
            if mapping.contains_key(&node.id()) {
                continue;
            }
            if expanded {
                let left = node.left_input().map(|input| {
                    mapping
                        .get(&NodeId::of(&input))
                        .cloned()
                        .expect("input copied before parent")
                });
                let right = node.right_input().map(|input| {
                    mapping
                        .get(&NodeId::of(&input))
                        .cloned()
                        .expect("input copied before parent")
                });

                let copy = node.shallow_copy(mapping);
                copy.set_left_input(left);
                copy.set_right_input(right);
            } else {
                stack.push((node.clone(), true));
                if let Some(left) = node.left_input() {
                    stack.push((left, false));
                }
                if let Some(right) = node.right_input() {
                    stack.push((right, false));
                }
            }
        }

        mapping
            .get(&self.id())
            .cloned()
            .expect("root was copied")
    }
}

impl Explainable for LqpNode {
    fn explain_entry(&self, conf: ExplainConfig) -> ExplainEntry {
        match &self.kind {
            NodeKind::StoredTable(n) => n.explain_entry(conf),
            NodeKind::Predicate(n) => n.explain_entry(conf),
            NodeKind::Projection(n) => n.explain_entry(conf),
            NodeKind::Join(n) => n.explain_entry(conf),
            NodeKind::Aggregate(n) => n.explain_entry(conf),
            NodeKind::Sort(n) => n.explain_entry(conf),
            NodeKind::Limit(n) => n.explain_entry(conf),
            NodeKind::Union(n) => n.explain_entry(conf),
            NodeKind::Validate(n) => n.explain_entry(conf),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_column::datatype::DataType;
    use tessera_error::ErrorKind;

    use super::*;
    use crate::catalog::TableEntry;
    use crate::expr::column_expr::ColumnExpr;
    use crate::expr::comparison_expr::{ComparisonExpr, ComparisonOperator};
    use crate::expr::literal_expr::LiteralExpr;
    use crate::lqp::join::{JoinMode, JoinNode};
    use crate::lqp::predicate::PredicateNode;
    use crate::lqp::projection::ProjectionNode;
    use crate::lqp::stored_table::StoredTableNode;

    fn orders() -> LqpNodeRef {
        StoredTableNode::new(Arc::new(
            TableEntry::new(
                "orders",
                [
                    tessera_column::field::Field::new("o_id", DataType::Int, false),
                    tessera_column::field::Field::new("o_total", DataType::Double, true),
                ],
                1000,
            )
            .with_unique_constraint([0]),
        ))
    }

    fn column(node: &LqpNodeRef, idx: usize) -> Expression {
        Expression::Column(ColumnExpr::new(node, ColumnId(idx)))
    }

    fn lt_eq(left: Expression, value: i32) -> Expression {
        Expression::Comparison(
            ComparisonExpr::try_new(
                left,
                ComparisonOperator::LtEq,
                Expression::Literal(LiteralExpr::new(value)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn column_expressions_match_nullability_range() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table);

        let columns = predicate.column_expressions().unwrap();
        assert_eq!(2, columns.len());
        for idx in 0..columns.len() {
            predicate.is_column_nullable(ColumnId(idx)).unwrap();
        }
        assert_eq!(
            ErrorKind::UnknownColumn,
            predicate
                .is_column_nullable(ColumnId(columns.len()))
                .unwrap_err()
                .kind()
        );
    }

    #[test]
    fn missing_input_is_invariant_violation() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table);
        predicate.set_left_input(None);

        let err = predicate.column_expressions().unwrap_err();
        assert_eq!(ErrorKind::InvariantViolation, err.kind());
    }

    #[test]
    fn shallow_copy_equals_original() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table.clone());

        let mut mapping = NodeMapping::default();
        let copy = predicate.shallow_copy(&mut mapping);

        assert!(copy.shallow_equals(&predicate, &mapping));
        assert!(predicate.shallow_equals(&copy, &mapping));
        assert_eq!(predicate.shallow_hash(), copy.shallow_hash());

        // Inputs are not copied; the caller wires them.
        assert!(copy.left_input().is_none());
        assert!(mapping.contains_key(&predicate.id()));
    }

    #[test]
    fn shallow_equals_discriminates_kind_and_expressions() {
        let table = orders();
        let p1 = PredicateNode::new(lt_eq(column(&table, 0), 10), table.clone());
        let p2 = PredicateNode::new(lt_eq(column(&table, 0), 11), table.clone());
        let projection = ProjectionNode::new([column(&table, 0)], table);

        let mapping = NodeMapping::default();
        assert!(!p1.shallow_equals(&p2, &mapping));
        assert!(!p1.shallow_equals(&projection, &mapping));
    }

    #[test]
    fn deep_copy_preserves_sharing() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table.clone());
        // The table feeds both the predicate and the join directly.
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![Expression::Comparison(
                ComparisonExpr::try_new(
                    column(&table, 0),
                    ComparisonOperator::Eq,
                    column(&table, 0),
                )
                .unwrap(),
            )],
            predicate,
            table.clone(),
        )
        .unwrap();

        let copy = join.deep_copy();
        copy.validate().unwrap();

        let copied_predicate = copy.left_input().unwrap();
        let copied_table_via_predicate = copied_predicate.left_input().unwrap();
        let copied_table = copy.right_input().unwrap();

        // The shared leaf was copied exactly once.
        assert!(Arc::ptr_eq(&copied_table_via_predicate, &copied_table));
        // And it is a copy, not the original.
        assert!(!Arc::ptr_eq(&copied_table, &table));

        // Expressions were rewritten to reference the copied leaf.
        let mut referenced = Vec::new();
        for expr in copied_predicate.node_expressions() {
            expr.for_each_column(&mut |col| {
                referenced.push(col.node_id());
                Ok(())
            })
            .unwrap();
        }
        assert!(!referenced.is_empty());
        assert!(referenced
            .iter()
            .all(|&id| id == NodeId::of(&copied_table)));
    }

    #[test]
    fn validate_rejects_foreign_column_references() {
        let table = orders();
        let other = orders();
        let predicate = PredicateNode::new(lt_eq(column(&other, 0), 10), table);

        let err = predicate.validate().unwrap_err();
        assert_eq!(ErrorKind::UnknownColumn, err.kind());
    }

    #[test]
    fn for_each_node_visits_shared_nodes_once() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table.clone());
        let join = JoinNode::new(
            JoinMode::Inner,
            vec![Expression::Comparison(
                ComparisonExpr::try_new(
                    column(&table, 0),
                    ComparisonOperator::Eq,
                    column(&table, 0),
                )
                .unwrap(),
            )],
            predicate,
            table,
        )
        .unwrap();

        let mut count = 0;
        join.for_each_node(&mut |_| count += 1);
        // Join, predicate and the single shared table.
        assert_eq!(3, count);
    }

    #[test]
    fn descriptions() {
        let table = orders();
        let predicate = PredicateNode::new(lt_eq(column(&table, 0), 10), table.clone());

        assert_eq!(
            "[StoredTable] table: orders",
            table.description(DescriptionMode::Short)
        );
        assert_eq!(
            "[StoredTable] table: orders [o_id Int] [o_total Double]",
            table.description(DescriptionMode::Detailed)
        );
        assert_eq!(
            "[Predicate] [o_id <= 10]",
            predicate.description(DescriptionMode::Short)
        );
    }
}
