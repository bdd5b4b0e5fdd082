use std::fmt;

use tessera_column::datatype::DataType;
use tessera_error::{Result, TesseraError};

use super::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    NotIn,
}

impl ComparisonOperator {
    pub const fn is_like(&self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }

    /// Operator with left and right operands swapped.
    pub const fn flip(&self) -> ComparisonOperator {
        match self {
            Self::Lt => Self::Gt,
            Self::LtEq => Self::GtEq,
            Self::Gt => Self::Lt,
            Self::GtEq => Self::LtEq,
            other => *other,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtEq => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtEq => write!(f, ">="),
            Self::Like => write!(f, "LIKE"),
            Self::NotLike => write!(f, "NOT LIKE"),
            Self::In => write!(f, "IN"),
            Self::NotIn => write!(f, "NOT IN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Hash)]
pub struct ComparisonExpr {
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub op: ComparisonOperator,
}

impl ComparisonExpr {
    /// Build a comparison, checking operand types against the compatibility
    /// matrix. LIKE additionally requires string operands.
    pub fn try_new(left: Expression, op: ComparisonOperator, right: Expression) -> Result<Self> {
        let left_type = left.datatype()?;
        let right_type = right.datatype()?;

        if !left_type.is_compatible_with(&right_type) {
            return Err(TesseraError::incompatible_types(format!(
                "cannot compare {left_type} with {right_type}: {left} {op} {right}"
            )));
        }

        if op.is_like() {
            for datatype in [left_type, right_type] {
                if !(datatype.is_string() || datatype == DataType::Null) {
                    return Err(TesseraError::incompatible_types(format!(
                        "{op} requires string operands, got {datatype}"
                    )));
                }
            }
        }

        Ok(ComparisonExpr {
            left: Box::new(left),
            right: Box::new(right),
            op,
        })
    }
}

impl fmt::Display for ComparisonExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
