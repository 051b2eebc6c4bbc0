//! Agent adapters: one capability, two backend families.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;

use crate::agent::Agent;
use crate::error::{ConferentiError, Result};
use crate::transport::http::build_client;
use crate::transport::{ChatTransport, OllamaTransport};
use crate::types::ToolSpec;

use super::remote::{RemoteAgent, RemoteAgentRequest, RemoteAgentService};
use super::selector::{BackendDecision, BackendFamily};

/// Arguments for creating an agent on either backend family.
///
/// ```
/// use conferenti_agent::backend::CreateAgentRequest;
///
/// let request = CreateAgentRequest::builder()
///     .name("bio_generator")
///     .instructions("You are a professional biography writer.")
///     .build();
/// assert!(request.tools.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct CreateAgentRequest {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub instructions: String,
    #[builder(default)]
    pub tools: Vec<ToolSpec>,
    /// Service-specific fields; only the remote family uses them.
    #[builder(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CreateAgentRequest {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// An agent created by an [`AgentAdapter`].
#[derive(Debug)]
pub enum AgentHandle {
    /// Runs turns in-process against a chat transport.
    Local(Agent),
    /// Owned by the remote agent service.
    Remote(RemoteAgent),
}

impl AgentHandle {
    pub fn family(&self) -> BackendFamily {
        match self {
            Self::Local(_) => BackendFamily::Local,
            Self::Remote(_) => BackendFamily::Remote,
        }
    }

    /// Unwrap a local agent; remote handles cannot run turns here.
    pub fn into_local(self) -> Result<Agent> {
        match self {
            Self::Local(agent) => Ok(agent),
            Self::Remote(remote) => Err(ConferentiError::UnsupportedOperation(format!(
                "agent {} is owned by the remote agent service",
                remote.id
            ))),
        }
    }
}

/// Creates agents for one backend family.
#[async_trait]
pub trait AgentAdapter: Send + Sync {
    fn family(&self) -> BackendFamily;

    /// Model every agent from this adapter uses.
    fn model(&self) -> &str;

    async fn create_agent(&self, request: CreateAgentRequest) -> Result<AgentHandle>;
}

/// Builds local agents. No I/O at creation time.
pub struct LocalAdapter {
    model: String,
    base_endpoint: String,
    transport: Arc<dyn ChatTransport>,
}

impl LocalAdapter {
    pub fn new(decision: &BackendDecision, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            model: decision.model.clone(),
            base_endpoint: decision.base_endpoint.clone(),
            transport,
        }
    }

    /// Local adapter talking to an Ollama server at the decision's base endpoint.
    ///
    /// With a `timeout`, the transport gets its own HTTP client instead of the
    /// shared one.
    pub fn ollama(decision: &BackendDecision, timeout: Option<Duration>) -> Self {
        let mut transport = OllamaTransport::new(decision.base_endpoint.clone());
        if let Some(timeout) = timeout {
            transport = transport.with_client(build_client(timeout));
        }
        Self::new(decision, Arc::new(transport))
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    /// Build an agent synchronously.
    pub fn build_agent(&self, request: CreateAgentRequest) -> Agent {
        Agent::new(
            self.model.clone(),
            request.name,
            request.instructions,
            self.base_endpoint.clone(),
            Arc::clone(&self.transport),
        )
        .with_tools(request.tools)
    }
}

impl fmt::Debug for LocalAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAdapter")
            .field("model", &self.model)
            .field("base_endpoint", &self.base_endpoint)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

#[async_trait]
impl AgentAdapter for LocalAdapter {
    fn family(&self) -> BackendFamily {
        BackendFamily::Local
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn create_agent(&self, request: CreateAgentRequest) -> Result<AgentHandle> {
        let agent = self.build_agent(request);
        tracing::debug!(agent = %agent.name(), id = %agent.id(), "created local agent");
        Ok(AgentHandle::Local(agent))
    }
}

/// Delegates agent creation to the remote agent service.
pub struct RemoteAdapter {
    model: String,
    service: Arc<dyn RemoteAgentService>,
}

impl RemoteAdapter {
    pub fn new(decision: &BackendDecision, service: Arc<dyn RemoteAgentService>) -> Self {
        Self {
            model: decision.model.clone(),
            service,
        }
    }
}

impl fmt::Debug for RemoteAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteAdapter")
            .field("model", &self.model)
            .field("service", &self.service.service_name())
            .finish()
    }
}

#[async_trait]
impl AgentAdapter for RemoteAdapter {
    fn family(&self) -> BackendFamily {
        BackendFamily::Remote
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn create_agent(&self, request: CreateAgentRequest) -> Result<AgentHandle> {
        let remote = self
            .service
            .create_agent(RemoteAgentRequest {
                model: self.model.clone(),
                name: request.name,
                instructions: request.instructions,
                tools: request.tools,
                extra: request.extra,
            })
            .await?;
        tracing::debug!(id = %remote.id, service = self.service.service_name(), "created remote agent");
        Ok(AgentHandle::Remote(remote))
    }
}
