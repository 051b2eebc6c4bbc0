//! Application context built once at startup.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::advisor::SpeakerAdvisor;
use crate::agent::{AgentSessions, SharedAgent};
use crate::backend::AgentClient;
use crate::conference::ConferenceStore;
use crate::config::AgentConfig;
use crate::error::Result;

/// Name given to per-session chat agents.
pub const SESSION_AGENT_NAME: &str = "conferenti-agent";

/// Configuration, agent client, store and live chat sessions, passed to
/// whatever serves requests.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<AgentConfig>,
    client: AgentClient,
    store: Arc<dyn ConferenceStore>,
    sessions: Arc<Mutex<AgentSessions>>,
}

impl AppContext {
    pub fn new(config: AgentConfig, client: AgentClient, store: Arc<dyn ConferenceStore>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            store,
            sessions: Arc::new(Mutex::new(AgentSessions::new())),
        }
    }

    /// Build the agent client from `config`.
    pub fn from_config(config: AgentConfig, store: Arc<dyn ConferenceStore>) -> Result<Self> {
        let client = AgentClient::from_config(&config)?;
        Ok(Self::new(config, client, store))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn client(&self) -> &AgentClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn ConferenceStore> {
        &self.store
    }

    pub fn advisor(&self) -> SpeakerAdvisor {
        SpeakerAdvisor::new(self.client.clone(), Arc::clone(&self.store))
    }

    /// The chat agent for `session_id`, created with `instructions` on first use.
    ///
    /// Later calls return the same agent and ignore `instructions`. The session
    /// map is not locked while the agent is being created.
    pub async fn session_agent(&self, session_id: &str, instructions: &str) -> Result<SharedAgent> {
        if let Some(agent) = self.sessions.lock().await.get(session_id) {
            return Ok(agent);
        }

        let agent = self
            .client
            .create_local_agent(SESSION_AGENT_NAME, instructions)
            .await?;
        debug!(session = %session_id, agent = %agent.id(), "opened chat session");

        // A concurrent caller may have opened the session meanwhile; keep theirs.
        Ok(self
            .sessions
            .lock()
            .await
            .get_or_insert_with(session_id, || agent))
    }

    /// Forget a chat session. Returns whether it existed.
    pub async fn end_session(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
