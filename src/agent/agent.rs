//! Core Agent struct with synchronous and streaming turns.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::error::ConferentiError;
use crate::transport::ChatTransport;
use crate::types::{ChatMessage, ToolSpec, TurnResult};

use super::history::History;
use super::stream::TurnStream;

const EMPTY_MESSAGE: &str = "message must not be empty";

/// A conversation-bearing agent running against a local chat transport.
///
/// One agent per logical conversation. Turns take `&mut self`, so turns on the
/// same agent are serialized by construction.
pub struct Agent {
    id: String,
    model: String,
    name: String,
    instructions: String,
    tools: Vec<ToolSpec>,
    endpoint: String,
    history: History,
    transport: Arc<dyn ChatTransport>,
}

/// Result of [`Agent::run_with`].
pub enum TurnOutcome<'a> {
    Completed(TurnResult),
    Streaming(TurnStream<'a>),
}

impl Agent {
    /// Create a new agent whose history holds only `instructions` as the system message.
    pub fn new(
        model: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
        endpoint: impl Into<String>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        let instructions = instructions.into();
        Self {
            id: format!("agent_{}", uuid::Uuid::new_v4().simple()),
            model: model.into(),
            name: name.into(),
            history: History::new(instructions.clone()),
            instructions,
            tools: Vec::new(),
            endpoint: endpoint.into(),
            transport,
        }
    }

    /// Attach tool definitions (kept as-is, never executed).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one synchronous turn.
    ///
    /// The user message is recorded before the transport is called; the
    /// assistant reply only when the call succeeds. Transport failures come
    /// back as a `Failed` result.
    pub async fn run(&mut self, message: impl Into<String>) -> TurnResult {
        let message = message.into();
        if message.trim().is_empty() {
            return TurnResult::failed(EMPTY_MESSAGE);
        }

        self.history.push_user(message);
        debug!(agent = %self.name, model = %self.model, "running turn");

        let outcome = self
            .transport
            .complete(self.history.messages(), &self.model)
            .await;

        match outcome {
            Ok(reply) => {
                self.history.push_assistant(reply.content.clone());
                TurnResult::completed(reply.content, self.model.clone())
            }
            Err(error) => {
                warn!(agent = %self.name, model = %self.model, error = %error, "turn failed");
                TurnResult::failed(error.to_string())
            }
        }
    }

    /// Start a streaming turn.
    ///
    /// The user message is recorded immediately; see [`TurnStream`] for when
    /// the reply is recorded.
    pub fn run_streaming(&mut self, message: impl Into<String>) -> TurnStream<'_> {
        let message = message.into();
        if message.trim().is_empty() {
            return TurnStream::rejected(
                &mut self.history,
                self.model.clone(),
                ConferentiError::InvalidArgument(EMPTY_MESSAGE.into()),
            );
        }

        self.history.push_user(message);
        debug!(agent = %self.name, model = %self.model, "running streaming turn");

        let transport = Arc::clone(&self.transport);
        let messages = self.history.snapshot();
        let model = self.model.clone();
        let opening = async move { transport.complete_streaming(&messages, &model).await }.boxed();

        TurnStream::open(&mut self.history, self.model.clone(), opening)
    }

    /// Run a turn in either mode.
    pub async fn run_with(&mut self, message: impl Into<String>, stream: bool) -> TurnOutcome<'_> {
        if stream {
            TurnOutcome::Streaming(self.run_streaming(message))
        } else {
            TurnOutcome::Completed(self.run(message).await)
        }
    }

    /// Drop every turn, keeping the original system message.
    pub fn clear_history(&mut self) {
        self.history.reset();
    }

    /// Copy of the conversation history.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.history.snapshot()
    }

    /// Borrowed view of the conversation history.
    pub fn conversation(&self) -> &History {
        &self.history
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("model", &self.model)
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("tools", &self.tools.len())
            .field("history", &self.history.message_count())
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}
