//! Chat transport trait and implementations.
//!
//! A transport performs the actual model inference call for a local agent.
//! Errors returned here never escape an [`Agent`](crate::agent::Agent): they
//! are folded into `Failed` turn results.

pub mod http;
pub mod ollama;

pub use ollama::OllamaTransport;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ChatMessage;

/// A complete (non-streamed) reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub content: String,
}

impl ChatCompletion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// One incremental fragment of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    pub content: String,
}

impl ChatChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Fragments of a streamed reply; an `Err` item ends the reply.
pub type ChunkStream = BoxStream<'static, Result<ChatChunk>>;

/// Core trait implemented by every chat backend.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name (e.g., "ollama").
    fn transport_name(&self) -> &str;

    /// Send the full history and wait for the whole reply.
    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatCompletion>;

    /// Send the full history and receive the reply incrementally.
    ///
    /// Fails either here (before the first fragment) or with an `Err` item
    /// mid-stream.
    async fn complete_streaming(&self, messages: &[ChatMessage], model: &str)
        -> Result<ChunkStream>;
}
