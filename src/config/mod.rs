//! Configuration system (layered: code > env > config file > defaults).

pub mod secrets;

pub use secrets::{EnvSecretSource, SecretSource, StaticSecretSource, AGENT_API_KEY_SECRET};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default agent-service API version sent by the remote backend.
pub const DEFAULT_API_VERSION: &str = "2025-05-01";

/// Default log filter when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk configuration (`config.toml`).
///
/// ```toml
/// endpoint = "http://localhost:11434/v1"
/// model = "llama3.2"
/// use_local = true
/// timeout_secs = 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub use_local: Option<bool>,
    pub api_key: Option<String>,
    pub api_version: Option<String>,
    pub log_level: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Layered configuration for the agent runtime.
///
/// Resolution order for the API key:
/// 1. Explicit key (from `with_api_key`, `API_KEY`, or the config file)
/// 2. The injected [`SecretSource`] (secret `AI-API-KEY`)
#[derive(Clone)]
pub struct AgentConfig {
    endpoint: Option<String>,
    model: Option<String>,
    use_local: Option<bool>,
    api_key: Option<String>,
    api_version: String,
    log_level: String,
    timeout: Option<Duration>,
    secrets: Option<Arc<dyn SecretSource>>,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("use_local", &self.use_local)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("log_level", &self.log_level)
            .field("timeout", &self.timeout)
            .field("secrets", &self.secrets.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentConfig {
    /// Create an empty config that falls back to environment secrets.
    pub fn new() -> Self {
        Self {
            endpoint: None,
            model: None,
            use_local: None,
            api_key: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            timeout: None,
            secrets: Some(Arc::new(EnvSecretSource)),
        }
    }

    /// Load from environment variables (`PROJECT_ENDPOINT`, `MODEL_DEPLOYMENT_NAME`, etc.).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::new().merge_env()
    }

    /// Load a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let file: FileConfig = toml::from_str(&raw)?;
        Ok(Self::new().merge_file(file))
    }

    /// Default file (if present) overlaid with the environment.
    pub fn load() -> Result<Self> {
        let base = match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            _ => Self::new(),
        };
        let _ = dotenvy::dotenv();
        Ok(base.merge_env())
    }

    fn merge_file(mut self, file: FileConfig) -> Self {
        if file.endpoint.is_some() {
            self.endpoint = file.endpoint;
        }
        if file.model.is_some() {
            self.model = file.model;
        }
        if file.use_local.is_some() {
            self.use_local = file.use_local;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if let Some(version) = file.api_version {
            self.api_version = version;
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    fn merge_env(mut self) -> Self {
        if let Some(endpoint) = env_var("PROJECT_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(model) = env_var("MODEL_DEPLOYMENT_NAME") {
            self.model = Some(model);
        }
        if let Some(raw) = env_var("USE_OLLAMA") {
            match parse_bool(&raw) {
                Some(flag) => self.use_local = Some(flag),
                None => tracing::warn!(value = %raw, "ignoring unrecognized USE_OLLAMA value"),
            }
        }
        if let Some(key) = env_var("API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(version) = env_var("AGENT_API_VERSION") {
            self.api_version = version;
        }
        if let Some(level) = env_var("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(raw) = env_var("AGENT_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring non-numeric AGENT_TIMEOUT_SECS")
                }
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Force the backend family: `true` for local, `false` for remote.
    pub fn with_use_local(mut self, use_local: bool) -> Self {
        self.use_local = Some(use_local);
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the secret source (or `None` to disable the fallback).
    pub fn with_secret_source(mut self, source: Option<Arc<dyn SecretSource>>) -> Self {
        self.secrets = source;
        self
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn use_local(&self) -> Option<bool> {
        self.use_local
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve the remote agent-service API key.
    pub fn api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }
        self.secrets
            .as_ref()
            .and_then(|source| source.get_secret(AGENT_API_KEY_SECRET))
    }
}

/// Location of the per-user config file.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "conferenti", "conferenti-agent")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
