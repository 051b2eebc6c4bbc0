//! Agents: conversation history plus synchronous and streaming turns.

pub mod agent;
pub mod history;
pub mod session;
pub mod stream;

pub use agent::{Agent, TurnOutcome};
pub use history::History;
pub use session::{AgentSessions, SharedAgent};
pub use stream::{TurnStream, TurnStreamState};
