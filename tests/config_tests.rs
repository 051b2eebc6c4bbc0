//! Tests for environment-driven configuration.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use conferenti_agent::backend::{BackendFamily, BackendSelector};
use conferenti_agent::config::{
    AgentConfig, EnvSecretSource, SecretSource, StaticSecretSource, AGENT_API_KEY_SECRET,
    DEFAULT_API_VERSION,
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 8] = [
    "PROJECT_ENDPOINT",
    "MODEL_DEPLOYMENT_NAME",
    "USE_OLLAMA",
    "API_KEY",
    "AI_API_KEY",
    "AGENT_API_VERSION",
    "LOG_LEVEL",
    "AGENT_TIMEOUT_SECS",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clean_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn empty_environment_uses_defaults() {
    let _lock = env_lock_guard();
    let _env = clean_env();

    let config = AgentConfig::from_env();
    assert_eq!(config.endpoint(), None);
    assert_eq!(config.model(), None);
    assert_eq!(config.use_local(), None);
    assert_eq!(config.api_key(), None);
    assert_eq!(config.api_version(), DEFAULT_API_VERSION);
    assert_eq!(config.log_level(), "info");
    assert_eq!(config.timeout(), None);

    let decision = BackendSelector::from_config(&config);
    assert_eq!(decision.family, BackendFamily::Local);
    assert_eq!(decision.base_endpoint, "http://localhost:11434");
}

#[test]
fn environment_variables_populate_config() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("PROJECT_ENDPOINT", "https://agents.example.com");
    std::env::set_var("MODEL_DEPLOYMENT_NAME", "gpt-4o");
    std::env::set_var("API_KEY", "env-key");
    std::env::set_var("AGENT_API_VERSION", "2024-12-01");
    std::env::set_var("LOG_LEVEL", "debug");
    std::env::set_var("AGENT_TIMEOUT_SECS", "15");

    let config = AgentConfig::from_env();
    assert_eq!(config.endpoint(), Some("https://agents.example.com"));
    assert_eq!(config.model(), Some("gpt-4o"));
    assert_eq!(config.api_key(), Some("env-key".to_string()));
    assert_eq!(config.api_version(), "2024-12-01");
    assert_eq!(config.log_level(), "debug");
    assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    assert_eq!(
        BackendSelector::from_config(&config).family,
        BackendFamily::Remote
    );
}

#[test]
fn use_ollama_overrides_endpoint_detection() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("PROJECT_ENDPOINT", "https://agents.example.com/v1");
    std::env::set_var("USE_OLLAMA", "true");

    let config = AgentConfig::from_env();
    assert_eq!(config.use_local(), Some(true));
    let decision = BackendSelector::from_config(&config);
    assert_eq!(decision.family, BackendFamily::Local);
    assert_eq!(decision.base_endpoint, "https://agents.example.com");
}

#[test]
fn unrecognized_use_ollama_is_ignored() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("USE_OLLAMA", "sometimes");
    std::env::set_var("AGENT_TIMEOUT_SECS", "soon");

    let config = AgentConfig::from_env();
    assert_eq!(config.use_local(), None);
    assert_eq!(config.timeout(), None);
}

#[test]
fn blank_variables_count_as_unset() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("PROJECT_ENDPOINT", "  ");

    assert_eq!(AgentConfig::from_env().endpoint(), None);
}

#[test]
fn api_key_secret_is_read_from_environment() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("AI_API_KEY", "vault-key");

    assert_eq!(
        EnvSecretSource.get_secret(AGENT_API_KEY_SECRET),
        Some("vault-key".to_string())
    );
    assert_eq!(AgentConfig::from_env().api_key(), Some("vault-key".to_string()));
}

#[test]
fn env_key_beats_secret_source() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("API_KEY", "env-key");

    let secrets = StaticSecretSource::new().with_secret(AGENT_API_KEY_SECRET, "vault-key");
    let config = AgentConfig::from_env().with_secret_source(Some(Arc::new(secrets)));
    assert_eq!(config.api_key(), Some("env-key".to_string()));
}

#[test]
fn code_overrides_beat_environment() {
    let _lock = env_lock_guard();
    let _env = clean_env();
    std::env::set_var("MODEL_DEPLOYMENT_NAME", "from-env");

    let config = AgentConfig::from_env()
        .with_model("from-code")
        .with_use_local(false);
    assert_eq!(config.model(), Some("from-code"));
    assert_eq!(config.use_local(), Some(false));
}
