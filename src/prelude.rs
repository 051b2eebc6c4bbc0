//! Convenience re-exports for common use.

pub use crate::advisor::SpeakerAdvisor;
pub use crate::agent::{Agent, AgentSessions, TurnOutcome, TurnStream};
pub use crate::backend::{
    create_agent_client, AgentClient, AgentHandle, BackendDecision, BackendFamily,
    BackendSelector, CreateAgentRequest,
};
pub use crate::conference::{ConferenceStore, InMemoryStore, Session, Speaker};
pub use crate::config::AgentConfig;
pub use crate::context::AppContext;
pub use crate::error::{ConferentiError, Result};
pub use crate::transport::{ChatTransport, OllamaTransport};
pub use crate::types::{ChatMessage, Role, TurnResult, TurnStatus};
