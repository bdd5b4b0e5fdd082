use std::fmt;

use tessera_error::{Result, TesseraError};

use super::Expression;

/// `<input> BETWEEN <lower> AND <upper>`
#[derive(Debug, Clone, PartialEq, Hash)]
pub struct BetweenExpr {
    pub input: Box<Expression>,
    pub lower: Box<Expression>,
    pub upper: Box<Expression>,
}

impl BetweenExpr {
    pub fn try_new(input: Expression, lower: Expression, upper: Expression) -> Result<Self> {
        let input_type = input.datatype()?;
        for bound in [&lower, &upper] {
            let bound_type = bound.datatype()?;
            if !input_type.is_compatible_with(&bound_type) {
                return Err(TesseraError::incompatible_types(format!(
                    "BETWEEN bound {bound} has type {bound_type}, incompatible with {input_type}"
                )));
            }
        }

        Ok(BetweenExpr {
            input: Box::new(input),
            lower: Box::new(lower),
            upper: Box::new(upper),
        })
    }
}

impl fmt::Display for BetweenExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BETWEEN {} AND {}", self.input, self.lower, self.upper)
    }
}
