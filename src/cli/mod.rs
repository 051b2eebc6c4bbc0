//! CLI definitions for the `conferenti-agent` binary.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::AgentConfig;

/// Instructions for the interactive assistant when `--system` is not given.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful AI assistant for the Conferenti session management system.

Your responsibilities:
- Help users find information about speakers and sessions
- Answer questions about session schedules
- Provide recommendations for relevant talks
- Assist with session planning and organization

Be concise, friendly, and professional in all interactions.";

/// Conferenti conference assistant
#[derive(Parser, Debug)]
#[command(name = "conferenti-agent", version, about = "Conferenti conference assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the assistant
    Chat(ChatArgs),
    /// Show which backend the current configuration selects
    Backend(BackendArgs),
}

/// Backend overrides shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    /// Model deployment name (overrides MODEL_DEPLOYMENT_NAME)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Project endpoint (overrides PROJECT_ENDPOINT)
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Force the local (Ollama) backend
    #[arg(long, conflicts_with = "remote")]
    pub local: bool,

    /// Force the remote agent service
    #[arg(long)]
    pub remote: bool,
}

impl BackendArgs {
    /// Explicit family choice, if any flag was given.
    pub fn use_local(&self) -> Option<bool> {
        match (self.local, self.remote) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Layer the flags over `config`.
    pub fn apply(&self, mut config: AgentConfig) -> AgentConfig {
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(use_local) = self.use_local() {
            config = config.with_use_local(use_local);
        }
        config
    }
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Agent name
    #[arg(long, default_value = "conferenti-agent")]
    pub name: String,

    /// System instructions
    #[arg(short, long)]
    pub system: Option<String>,

    /// Wait for the whole reply instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Send one prompt and exit instead of starting the REPL
    pub prompt: Option<String>,
}

impl ChatArgs {
    pub fn instructions(&self) -> &str {
        self.system.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
    }

    pub fn apply(&self, config: AgentConfig) -> AgentConfig {
        let config = self.backend.apply(config);
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// A line typed at the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput<'a> {
    Empty,
    Exit,
    Clear,
    Message(&'a str),
}

impl<'a> ReplInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        match line.to_lowercase().as_str() {
            "exit" | "quit" => Self::Exit,
            "clear" => Self::Clear,
            _ => Self::Message(line),
        }
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
