//! Agent client: backend selection plus the matching adapter.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::{ConferentiError, Result};

use super::adapter::{AgentAdapter, AgentHandle, CreateAgentRequest, LocalAdapter, RemoteAdapter};
use super::remote::HttpAgentService;
use super::selector::{BackendDecision, BackendFamily, BackendSelector};

/// Entry point for creating agents, bound to one backend decision.
#[derive(Clone)]
pub struct AgentClient {
    decision: BackendDecision,
    adapter: Arc<dyn AgentAdapter>,
}

impl AgentClient {
    /// Pair a decision with an already-built adapter.
    pub fn new(decision: BackendDecision, adapter: Arc<dyn AgentAdapter>) -> Self {
        Self { decision, adapter }
    }

    /// Select the backend from configuration and build the default adapter for it.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::for_decision(BackendSelector::from_config(config), config)
    }

    /// Build the default adapter for `decision`.
    ///
    /// Local: an Ollama transport on `base_endpoint`. Remote: the REST agent
    /// service on the original endpoint, which requires an API key.
    pub fn for_decision(decision: BackendDecision, config: &AgentConfig) -> Result<Self> {
        let adapter: Arc<dyn AgentAdapter> = match decision.family {
            BackendFamily::Local => Arc::new(LocalAdapter::ollama(&decision, config.timeout())),
            BackendFamily::Remote => {
                let api_key = config.api_key().ok_or_else(|| {
                    ConferentiError::Configuration(
                        "Missing API_KEY (or AI-API-KEY secret) for the remote agent service"
                            .into(),
                    )
                })?;
                let service =
                    HttpAgentService::new(decision.endpoint.clone(), api_key, config.api_version());
                Arc::new(RemoteAdapter::new(&decision, Arc::new(service)))
            }
        };

        info!(
            family = %decision.family,
            model = %decision.model,
            endpoint = %decision.endpoint,
            "agent client ready"
        );
        Ok(Self::new(decision, adapter))
    }

    pub fn decision(&self) -> &BackendDecision {
        &self.decision
    }

    pub fn family(&self) -> BackendFamily {
        self.adapter.family()
    }

    pub fn model(&self) -> &str {
        self.adapter.model()
    }

    /// Create an agent with just a name and instructions.
    pub async fn create_agent(
        &self,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Result<AgentHandle> {
        self.adapter
            .create_agent(CreateAgentRequest::new(name, instructions))
            .await
    }

    /// Create an agent with tools and service-specific extras.
    pub async fn create_agent_with(&self, request: CreateAgentRequest) -> Result<AgentHandle> {
        self.adapter.create_agent(request).await
    }

    /// Create an agent that runs turns in this process.
    ///
    /// Fails with `UnsupportedOperation` on the remote family without calling
    /// the agent service.
    pub async fn create_local_agent(
        &self,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Result<Agent> {
        if self.family() == BackendFamily::Remote {
            return Err(ConferentiError::UnsupportedOperation(format!(
                "{} agents cannot run turns in-process",
                BackendFamily::Remote
            )));
        }
        self.create_agent(name, instructions).await?.into_local()
    }
}

impl fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentClient")
            .field("decision", &self.decision)
            .field("family", &self.adapter.family())
            .finish()
    }
}

/// Build an agent client, optionally forcing the backend family.
pub fn create_agent_client(config: &AgentConfig, use_local: Option<bool>) -> Result<AgentClient> {
    let decision = BackendSelector::select(
        use_local.or(config.use_local()),
        config.endpoint(),
        config.model(),
    );
    AgentClient::for_decision(decision, config)
}
