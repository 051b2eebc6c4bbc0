//! Per-turn results reported by an agent.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::message::ChatMessage;

/// Status of a turn or of one streamed chunk of a turn.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TurnStatus {
    Completed,
    InProgress,
    Failed,
}

/// Outcome of a synchronous turn, or a single chunk of a streaming turn.
///
/// Transport failures are reported here with `status == Failed` rather than
/// as an `Err`, so callers branch on [`TurnResult::status`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnResult {
    pub status: TurnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The assistant message appended by a completed synchronous turn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChatMessage>,
}

impl TurnResult {
    /// A completed synchronous turn.
    pub fn completed(content: impl Into<String>, model: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            status: TurnStatus::Completed,
            message: Some(ChatMessage::assistant(content.clone())),
            content: Some(content),
            delta: None,
            error: None,
            model: Some(model.into()),
        }
    }

    /// One streamed fragment. `content` and `delta` both carry the fragment.
    pub fn in_progress(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        Self {
            status: TurnStatus::InProgress,
            content: Some(fragment.clone()),
            delta: Some(fragment),
            error: None,
            model: None,
            message: None,
        }
    }

    /// A failed turn.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: TurnStatus::Failed,
            content: None,
            delta: None,
            error: Some(error.into()),
            model: None,
            message: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TurnStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TurnStatus::Failed
    }
}
