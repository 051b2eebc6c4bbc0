//! Conferenti agent runtime.
//!
//! Creates conversation-bearing agents against either a local Ollama server
//! or a remote agent service, runs synchronous and streaming turns, and
//! builds speaker planning helpers on top.
//!
//! # Quick Start
//!
//! ```no_run
//! use conferenti_agent::prelude::*;
//!
//! # async fn example() -> conferenti_agent::error::Result<()> {
//! let config = AgentConfig::from_env();
//! let client = AgentClient::from_config(&config)?;
//! let mut agent = client
//!     .create_agent("conferenti-agent", "You are a helpful assistant.")
//!     .await?
//!     .into_local()?;
//! let reply = agent.run("Who is speaking about Kubernetes?").await;
//! println!("{:?}", reply.content);
//! # Ok(())
//! # }
//! ```

pub mod advisor;
pub mod agent;
pub mod backend;
pub mod conference;
pub mod config;
pub mod context;
pub mod error;
pub mod prelude;
pub mod prompts;
pub mod transport;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
