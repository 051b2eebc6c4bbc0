//! Opaque tool definitions.

use serde::{Deserialize, Serialize};

/// A tool definition handed to an agent.
///
/// The runtime never interprets it: local agents keep it alongside their
/// history and remote agent services receive it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ToolSpec(pub serde_json::Value);

impl ToolSpec {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for ToolSpec {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}
