pub mod aggregate_expr;
pub mod between_expr;
pub mod column_expr;
pub mod comparison_expr;
pub mod conjunction_expr;
pub mod literal_expr;

use std::fmt;

use tessera_column::datatype::DataType;
use tessera_error::Result;

use crate::explain::explainable::DescriptionMode;
use crate::lqp::node::NodeMapping;
use aggregate_expr::{AggregateExpr, AggregateFunction};
use between_expr::BetweenExpr;
use column_expr::ColumnExpr;
use comparison_expr::ComparisonExpr;
use conjunction_expr::{ConjunctionExpr, ConjunctionOperator};
use literal_expr::LiteralExpr;

#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Expression {
    Aggregate(AggregateExpr),
    Between(BetweenExpr),
    Column(ColumnExpr),
    Comparison(ComparisonExpr),
    Conjunction(ConjunctionExpr),
    Literal(LiteralExpr),
}

impl Expression {
    pub fn datatype(&self) -> Result<DataType> {
        Ok(match self {
            Self::Aggregate(expr) => expr.agg.return_type(expr.input.datatype()?),
            // Predicates evaluate to 0/1 ints; the engine carries no boolean
            // column tag.
            Self::Between(_) => DataType::Int,
            Self::Column(expr) => expr.datatype()?,
            Self::Comparison(_) => DataType::Int,
            Self::Conjunction(_) => DataType::Int,
            Self::Literal(expr) => expr.literal.datatype(),
        })
    }

    /// Whether the expression may evaluate to NULL, given the nullability of
    /// the columns it references.
    pub fn is_nullable(&self) -> Result<bool> {
        Ok(match self {
            // COUNT is never null. The other aggregates are null on an empty
            // group; the aggregate node refines this when a GROUP BY makes
            // empty groups impossible.
            Self::Aggregate(expr) => !matches!(expr.agg, AggregateFunction::Count),
            // Three-valued logic: null if any operand is null. LIKE requires
            // both operands non-null, which reduces to the same rule.
            Self::Between(expr) => {
                expr.input.is_nullable()?
                    || expr.lower.is_nullable()?
                    || expr.upper.is_nullable()?
            }
            Self::Column(expr) => expr.is_nullable()?,
            Self::Comparison(expr) => expr.left.is_nullable()? || expr.right.is_nullable()?,
            Self::Conjunction(expr) => {
                let mut nullable = false;
                for child in &expr.expressions {
                    nullable = nullable || child.is_nullable()?;
                }
                nullable
            }
            Self::Literal(expr) => expr.literal.is_null(),
        })
    }

    pub const fn is_column_expr(&self) -> bool {
        matches!(self, Self::Column(_))
    }

    /// Human form of the expression; the detailed mode appends the produced
    /// data type when it can be resolved.
    pub fn description(&self, mode: DescriptionMode) -> String {
        match mode {
            DescriptionMode::Short => self.to_string(),
            DescriptionMode::Detailed => match self.datatype() {
                Ok(datatype) => format!("{self} ({datatype})"),
                Err(_) => self.to_string(),
            },
        }
    }

    /// ANDs all expressions, only returning None if the iterator contains no
    /// expressions.
    pub fn and_all(exprs: impl IntoIterator<Item = Expression>) -> Option<Expression> {
        let mut exprs = exprs.into_iter().peekable();
        let first = exprs.next()?;
        if exprs.peek().is_none() {
            return Some(first);
        }

        let mut expressions = vec![first];
        expressions.extend(exprs);
        Some(Expression::Conjunction(ConjunctionExpr {
            op: ConjunctionOperator::And,
            expressions,
        }))
    }

    pub fn for_each_child<F>(&self, func: &mut F) -> Result<()>
    where
        F: FnMut(&Expression) -> Result<()>,
    {
        match self {
            Self::Aggregate(agg) => func(&agg.input)?,
            Self::Between(between) => {
                func(&between.input)?;
                func(&between.lower)?;
                func(&between.upper)?;
            }
            Self::Column(_) => (),
            Self::Comparison(comp) => {
                func(&comp.left)?;
                func(&comp.right)?;
            }
            Self::Conjunction(conj) => {
                for expr in &conj.expressions {
                    func(expr)?;
                }
            }
            Self::Literal(_) => (),
        }
        Ok(())
    }

    pub fn for_each_child_mut<F>(&mut self, func: &mut F) -> Result<()>
    where
        F: FnMut(&mut Expression) -> Result<()>,
    {
        match self {
            Self::Aggregate(agg) => func(&mut agg.input)?,
            Self::Between(between) => {
                func(&mut between.input)?;
                func(&mut between.lower)?;
                func(&mut between.upper)?;
            }
            Self::Column(_) => (),
            Self::Comparison(comp) => {
                func(&mut comp.left)?;
                func(&mut comp.right)?;
            }
            Self::Conjunction(conj) => {
                for expr in &mut conj.expressions {
                    func(expr)?;
                }
            }
            Self::Literal(_) => (),
        }
        Ok(())
    }

    /// Visit every column reference in the tree.
    pub fn for_each_column<F>(&self, func: &mut F) -> Result<()>
    where
        F: FnMut(&ColumnExpr) -> Result<()>,
    {
        match self {
            Self::Column(col) => func(col),
            other => other.for_each_child(&mut |child| child.for_each_column(func)),
        }
    }

    /// Structural equality where column references on either side may be
    /// resolved through a node-identity mapping.
    pub fn eq_with_mapping(&self, other: &Expression, mapping: &NodeMapping) -> bool {
        match (self, other) {
            (Self::Column(a), Self::Column(b)) => {
                if a.column != b.column {
                    return false;
                }
                let a_id = a.node_id();
                let b_id = b.node_id();
                if a_id == b_id {
                    return true;
                }
                mapping.get(&b_id).map(crate::lqp::node::NodeId::of) == Some(a_id)
                    || mapping.get(&a_id).map(crate::lqp::node::NodeId::of) == Some(b_id)
            }
            (Self::Aggregate(a), Self::Aggregate(b)) => {
                a.agg == b.agg && a.input.eq_with_mapping(&b.input, mapping)
            }
            (Self::Between(a), Self::Between(b)) => {
                a.input.eq_with_mapping(&b.input, mapping)
                    && a.lower.eq_with_mapping(&b.lower, mapping)
                    && a.upper.eq_with_mapping(&b.upper, mapping)
            }
            (Self::Comparison(a), Self::Comparison(b)) => {
                a.op == b.op
                    && a.left.eq_with_mapping(&b.left, mapping)
                    && a.right.eq_with_mapping(&b.right, mapping)
            }
            (Self::Conjunction(a), Self::Conjunction(b)) => {
                a.op == b.op
                    && a.expressions.len() == b.expressions.len()
                    && a.expressions
                        .iter()
                        .zip(&b.expressions)
                        .all(|(x, y)| x.eq_with_mapping(y, mapping))
            }
            (Self::Literal(a), Self::Literal(b)) => a == b,
            _ => false,
        }
    }

    /// Clone the expression, rewriting column references through the supplied
    /// node-identity mapping. References to nodes without a mapping entry are
    /// kept as-is, so shared sub-plans stay shared.
    pub fn deep_copy(&self, mapping: &NodeMapping) -> Expression {
        match self {
            Self::Aggregate(agg) => Expression::Aggregate(AggregateExpr {
                agg: agg.agg,
                input: Box::new(agg.input.deep_copy(mapping)),
            }),
            Self::Between(between) => Expression::Between(BetweenExpr {
                input: Box::new(between.input.deep_copy(mapping)),
                lower: Box::new(between.lower.deep_copy(mapping)),
                upper: Box::new(between.upper.deep_copy(mapping)),
            }),
            Self::Column(col) => match mapping.get(&col.node_id()) {
                Some(target) => Expression::Column(ColumnExpr::new(target, col.column)),
                None => Expression::Column(col.clone()),
            },
            Self::Comparison(comp) => Expression::Comparison(ComparisonExpr {
                left: Box::new(comp.left.deep_copy(mapping)),
                right: Box::new(comp.right.deep_copy(mapping)),
                op: comp.op,
            }),
            Self::Conjunction(conj) => Expression::Conjunction(ConjunctionExpr {
                op: conj.op,
                expressions: conj.expressions.iter().map(|e| e.deep_copy(mapping)).collect(),
            }),
            Self::Literal(lit) => Expression::Literal(lit.clone()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aggregate(expr) => write!(f, "{expr}"),
            Self::Between(expr) => write!(f, "{expr}"),
            Self::Column(expr) => write!(f, "{expr}"),
            Self::Comparison(expr) => write!(f, "{expr}"),
            Self::Conjunction(expr) => write!(f, "{expr}"),
            Self::Literal(expr) => write!(f, "{expr}"),
        }
    }
}
