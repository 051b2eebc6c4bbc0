//! Shared test helpers and a scripted chat transport.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use conferenti_agent::agent::Agent;
use conferenti_agent::backend::{BackendDecision, BackendFamily};
use conferenti_agent::error::{ConferentiError, Result};
use conferenti_agent::transport::{ChatChunk, ChatCompletion, ChatTransport, ChunkStream};
use conferenti_agent::types::ChatMessage;

pub const TEST_MODEL: &str = "llama3.2";
pub const TEST_ENDPOINT: &str = "http://localhost:11434";

/// One scripted reply, consumed in order by either call style.
#[derive(Debug, Clone)]
pub enum Script {
    /// Synchronous reply text.
    Reply(String),
    /// Transport error returned before any output.
    Fail(String),
    /// Streamed fragments followed by an optional mid-stream error.
    Fragments {
        fragments: Vec<String>,
        error: Option<String>,
    },
    /// Never completes.
    Hang,
}

/// A transport that replays queued scripts and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    /// Queue a synchronous reply.
    pub fn queue_reply(&self, text: &str) {
        self.push(Script::Reply(text.to_string()));
    }

    /// Queue a transport failure.
    pub fn queue_failure(&self, message: &str) {
        self.push(Script::Fail(message.to_string()));
    }

    /// Queue a stream that ends cleanly.
    pub fn queue_fragments(&self, fragments: &[&str]) {
        self.push(Script::Fragments {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            error: None,
        });
    }

    /// Queue a stream that fails after `fragments`.
    pub fn queue_broken_stream(&self, fragments: &[&str], error: &str) {
        self.push(Script::Fragments {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            error: Some(error.to_string()),
        });
    }

    /// Message lists received so far, one per call.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next(&self, messages: &[ChatMessage]) -> Script {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::Reply("Mock response".to_string()))
    }
}

fn scripted_error(message: String) -> ConferentiError {
    ConferentiError::Provider {
        provider: "scripted".into(),
        message,
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    fn transport_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, messages: &[ChatMessage], _model: &str) -> Result<ChatCompletion> {
        match self.next(messages) {
            Script::Reply(text) => Ok(ChatCompletion::new(text)),
            Script::Fragments { fragments, error } => match error {
                Some(message) => Err(scripted_error(message)),
                None => Ok(ChatCompletion::new(fragments.concat())),
            },
            Script::Fail(message) => Err(scripted_error(message)),
            Script::Hang => futures::future::pending().await,
        }
    }

    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        _model: &str,
    ) -> Result<ChunkStream> {
        let (fragments, error) = match self.next(messages) {
            Script::Reply(text) => (vec![text], None),
            Script::Fragments { fragments, error } => (fragments, error),
            Script::Fail(message) => return Err(scripted_error(message)),
            Script::Hang => return futures::future::pending().await,
        };

        let stream = async_stream::stream! {
            for fragment in fragments {
                yield Ok(ChatChunk::new(fragment));
            }
            if let Some(message) = error {
                yield Err(scripted_error(message));
            }
        };
        Ok(Box::pin(stream))
    }
}

/// A local agent wired to `transport`.
pub fn agent_with(transport: Arc<ScriptedTransport>, instructions: &str) -> Agent {
    Agent::new(TEST_MODEL, "test-agent", instructions, TEST_ENDPOINT, transport)
}

pub fn local_decision() -> BackendDecision {
    BackendDecision {
        family: BackendFamily::Local,
        model: TEST_MODEL.to_string(),
        base_endpoint: TEST_ENDPOINT.to_string(),
        endpoint: format!("{TEST_ENDPOINT}/v1"),
    }
}
