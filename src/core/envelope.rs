//! The uniform result shape handed back to the MCP layer for every tool call.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EnvelopeContent {
    Text { text: String },
}

/// `{ content: [{ type: "text", text }], isError }`
///
/// `is_error` is true iff the call did not produce an upstream success to surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub content: Vec<EnvelopeContent>,
    pub is_error: bool,
}

impl ResultEnvelope {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![EnvelopeContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![EnvelopeContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Concatenated text of all content items.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                EnvelopeContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Prefix every text item, used by operations to label their output.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        for c in &mut self.content {
            let EnvelopeContent::Text { text } = c;
            text.insert_str(0, prefix);
        }
        self
    }
}

impl From<ResultEnvelope> for CallToolResult {
    fn from(env: ResultEnvelope) -> Self {
        let content = env
            .content
            .into_iter()
            .map(|c| match c {
                EnvelopeContent::Text { text } => Content::text(text),
            })
            .collect();
        if env.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}
