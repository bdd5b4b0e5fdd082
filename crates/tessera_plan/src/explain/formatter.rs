use serde::{Deserialize, Serialize};
use tessera_error::{Result, ResultExt};

use super::explainable::{ExplainConfig, ExplainEntry, Explainable};
use crate::lqp::node::LqpNodeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplainFormat {
    Text,
    Json,
}

/// Formats a whole plan for display.
#[derive(Debug)]
pub struct ExplainFormatter {
    config: ExplainConfig,
    format: ExplainFormat,
}

impl ExplainFormatter {
    pub fn new(config: ExplainConfig, format: ExplainFormat) -> Self {
        ExplainFormatter { config, format }
    }

    pub fn format_plan(&self, root: &LqpNodeRef) -> Result<String> {
        let node = ExplainNode::walk_plan(root, self.config);
        self.format(&node)
    }

    fn format(&self, node: &ExplainNode) -> Result<String> {
        match self.format {
            ExplainFormat::Text => {
                fn fmt(node: &ExplainNode, indent: usize, buf: &mut String) -> Result<()> {
                    use std::fmt::Write as _;
                    writeln!(buf, "{}{}", " ".repeat(indent), node.entry)
                        .context("failed to write to explain buffer")?;

                    for child in &node.children {
                        fmt(child, indent + 2, buf)?;
                    }

                    Ok(())
                }

                let mut buf = String::new();
                fmt(node, 0, &mut buf)?;

                Ok(buf)
            }
            ExplainFormat::Json => {
                serde_json::to_string(&node).context("failed to serialize to json")
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExplainNode {
    entry: ExplainEntry,
    children: Vec<ExplainNode>,
}

impl ExplainNode {
    fn walk_plan(plan: &LqpNodeRef, config: ExplainConfig) -> ExplainNode {
        let entry = plan.explain_entry(config);

        // A sub-plan shared by several parents renders once per parent.
        let children = [plan.left_input(), plan.right_input()]
            .into_iter()
            .flatten()
            .map(|child| Self::walk_plan(&child, config))
            .collect();

        ExplainNode { entry, children }
    }
}
