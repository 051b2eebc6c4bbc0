//! Shared HTTP client and status handling.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::error::ConferentiError;

/// Request timeout applied by the shared client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| build_client(DEFAULT_REQUEST_TIMEOUT))
}

/// Build a client with a custom request timeout.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Build default headers for an `api-key` authenticated service.
pub fn api_key_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(api_key) {
        headers.insert("api-key", val);
    }
    headers
}

/// Map a non-success HTTP status to an error, preferring the body's message.
pub fn status_to_error(status: u16, body: &str) -> ConferentiError {
    ConferentiError::api(status, extract_error_message(body))
}

fn extract_error_message(body: &str) -> String {
    // Ollama: {"error": "..."}; agent services: {"error": {"message": "..."}}
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let error = v.get("error")?;
            error
                .as_str()
                .or_else(|| error.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
