//! Backend family selection.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::AgentConfig;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/v1";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama3.2";

/// Substrings that mark an endpoint as a local model server.
pub const LOCAL_ENDPOINT_MARKERS: [&str; 4] =
    ["localhost", "127.0.0.1", "host.docker.internal", "ollama"];

/// Which kind of backend an agent runs against.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BackendFamily {
    /// Single-process model server on the same host (Ollama-style).
    Local,
    /// Managed multi-tenant agent service.
    Remote,
}

/// Outcome of backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDecision {
    pub family: BackendFamily,
    pub model: String,
    /// Endpoint with any trailing `/v1` removed; the local transport's host:port.
    pub base_endpoint: String,
    /// Endpoint exactly as configured, handed to the remote service.
    pub endpoint: String,
}

/// Decides between the local and remote backend families.
pub struct BackendSelector;

impl BackendSelector {
    /// Select a backend. Never fails and never touches the network.
    ///
    /// `explicit_override`: `Some(true)` forces local, `Some(false)` forces
    /// remote; `None` inspects the endpoint.
    pub fn select(
        explicit_override: Option<bool>,
        endpoint: Option<&str>,
        model: Option<&str>,
    ) -> BackendDecision {
        let endpoint = endpoint.unwrap_or(DEFAULT_ENDPOINT);
        let family = match explicit_override {
            Some(true) => BackendFamily::Local,
            Some(false) => BackendFamily::Remote,
            None if is_local_endpoint(endpoint) => BackendFamily::Local,
            None => BackendFamily::Remote,
        };

        let decision = BackendDecision {
            family,
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_endpoint: strip_version_suffix(endpoint).to_string(),
            endpoint: endpoint.to_string(),
        };
        tracing::debug!(
            family = %decision.family,
            model = %decision.model,
            endpoint = %decision.endpoint,
            overridden = explicit_override.is_some(),
            "selected backend"
        );
        decision
    }

    /// Select from configuration (`PROJECT_ENDPOINT`, `MODEL_DEPLOYMENT_NAME`, `USE_OLLAMA`).
    pub fn from_config(config: &AgentConfig) -> BackendDecision {
        Self::select(config.use_local(), config.endpoint(), config.model())
    }
}

/// Case-insensitive check against [`LOCAL_ENDPOINT_MARKERS`].
pub fn is_local_endpoint(endpoint: &str) -> bool {
    let lowered = endpoint.to_lowercase();
    LOCAL_ENDPOINT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn strip_version_suffix(endpoint: &str) -> &str {
    endpoint.strip_suffix("/v1").unwrap_or(endpoint)
}
