//! Backend selection and agent creation for the local and remote families.

pub mod adapter;
pub mod client;
pub mod remote;
pub mod selector;

pub use adapter::{AgentAdapter, AgentHandle, CreateAgentRequest, LocalAdapter, RemoteAdapter};
pub use client::{create_agent_client, AgentClient};
pub use remote::{HttpAgentService, RemoteAgent, RemoteAgentRequest, RemoteAgentService};
pub use selector::{BackendDecision, BackendFamily, BackendSelector};
