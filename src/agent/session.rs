//! Agent session management.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::agent::Agent;

/// An agent shared between request handlers; the lock serializes its turns.
pub type SharedAgent = Arc<Mutex<Agent>>;

/// Maps session IDs to their agents, one agent per conversation.
#[derive(Debug, Default)]
pub struct AgentSessions {
    sessions: HashMap<String, SharedAgent>,
}

impl AgentSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session's agent, creating it with `create` on first use.
    pub fn get_or_insert_with(
        &mut self,
        session_id: &str,
        create: impl FnOnce() -> Agent,
    ) -> SharedAgent {
        Arc::clone(
            self.sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(create()))),
        )
    }

    /// Register an agent, replacing any previous one for the session.
    pub fn insert(&mut self, session_id: impl Into<String>, agent: Agent) -> SharedAgent {
        let shared = Arc::new(Mutex::new(agent));
        self.sessions.insert(session_id.into(), Arc::clone(&shared));
        shared
    }

    /// Get an existing session.
    pub fn get(&self, session_id: &str) -> Option<SharedAgent> {
        self.sessions.get(session_id).cloned()
    }

    /// Remove a session.
    pub fn remove(&mut self, session_id: &str) -> Option<SharedAgent> {
        self.sessions.remove(session_id)
    }

    /// List session IDs.
    pub fn session_ids(&self) -> Vec<&str> {
        self.sessions.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
