//! Secret lookup used as the last configuration layer for credentials.

use std::collections::HashMap;

/// Name of the secret holding the remote agent-service API key.
pub const AGENT_API_KEY_SECRET: &str = "AI-API-KEY";

/// Storage abstraction for named secrets (a vault, the environment, a map).
pub trait SecretSource: Send + Sync {
    fn get_secret(&self, name: &str) -> Option<String>;
}

/// Reads secrets from environment variables.
///
/// Vault-style names are mapped to variable names by upper-casing and
/// replacing `-` with `_`, so `AI-API-KEY` is read from `AI_API_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretSource;

impl EnvSecretSource {
    pub fn variable_name(secret: &str) -> String {
        secret.trim().replace('-', "_").to_ascii_uppercase()
    }
}

impl SecretSource for EnvSecretSource {
    fn get_secret(&self, name: &str) -> Option<String> {
        std::env::var(Self::variable_name(name))
            .ok()
            .filter(|value| !value.is_empty())
    }
}

/// In-memory secrets, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretSource {
    secrets: HashMap<String, String>,
}

impl StaticSecretSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

impl SecretSource for StaticSecretSource {
    fn get_secret(&self, name: &str) -> Option<String> {
        self.secrets.get(name).cloned()
    }
}
