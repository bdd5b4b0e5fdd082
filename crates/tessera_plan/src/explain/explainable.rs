use serde::{Deserialize, Serialize};
use std::fmt;

/// How much detail a description should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionMode {
    Short,
    Detailed,
}

impl DescriptionMode {
    pub const fn config(self) -> ExplainConfig {
        ExplainConfig {
            verbose: matches!(self, Self::Detailed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainConfig {
    pub verbose: bool,
}

/// A single key/value or key/list attribute of an explain entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExplainValue {
    Scalar { key: String, value: String },
    List { key: String, values: Vec<String> },
}

/// Description of a node in a plan.
///
/// Displays as `[Kind] attr1: v1 [expr1] [expr2] …` — scalar attributes as
/// `key: value`, list attributes as one bracketed item each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainEntry {
    pub name: String,
    pub values: Vec<ExplainValue>,
}

impl ExplainEntry {
    pub fn new(name: impl Into<String>) -> Self {
        ExplainEntry {
            name: name.into(),
            values: Vec::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.values.push(ExplainValue::Scalar {
            key: key.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_values<S: fmt::Display>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        self.values.push(ExplainValue::List {
            key: key.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        });
        self
    }
}

impl fmt::Display for ExplainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)?;
        for value in &self.values {
            match value {
                ExplainValue::Scalar { key, value } => write!(f, " {key}: {value}")?,
                ExplainValue::List { values, .. } => {
                    for item in values {
                        write!(f, " [{item}]")?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub trait Explainable {
    /// Create an explain entry for this item.
    fn explain_entry(&self, conf: ExplainConfig) -> ExplainEntry;
}
