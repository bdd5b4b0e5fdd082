use std::fmt;

use tessera_column::scalar::ScalarValue;

#[derive(Debug, Clone, PartialEq, Hash)]
pub struct LiteralExpr {
    pub literal: ScalarValue,
}

impl LiteralExpr {
    pub fn new(literal: impl Into<ScalarValue>) -> Self {
        LiteralExpr {
            literal: literal.into(),
        }
    }
}

impl fmt::Display for LiteralExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.literal)
    }
}
