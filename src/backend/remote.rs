//! Remote agent-service boundary.
//!
//! On the remote family agent creation is delegated verbatim; the returned
//! handle is opaque and its run semantics belong to the service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConferentiError, Result};
use crate::transport::http::{api_key_headers, shared_client, status_to_error};
use crate::types::ToolSpec;

const AGENT_SERVICE: &str = "agent-service";

/// Arguments forwarded to the remote service's agent-creation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteAgentRequest {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub tools: Vec<ToolSpec>,
    /// Extra service-specific fields, passed through untouched.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RemoteAgentRequest {
    /// Request body: the named fields plus every `extra` key that does not collide with them.
    pub fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("model".into(), self.model.clone().into());
        body.insert("name".into(), self.name.clone().into());
        body.insert("instructions".into(), self.instructions.clone().into());
        body.insert(
            "tools".into(),
            serde_json::Value::Array(self.tools.iter().map(|t| t.0.clone()).collect()),
        );
        for (key, value) in &self.extra {
            if body.contains_key(key) {
                warn!(key = %key, "ignoring extra field that shadows a named argument");
                continue;
            }
            body.insert(key.clone(), value.clone());
        }
        serde_json::Value::Object(body)
    }
}

/// Opaque handle to an agent owned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteAgent {
    pub id: String,
    pub model: String,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Full service response.
    pub raw: serde_json::Value,
}

impl RemoteAgent {
    /// Build a handle from a creation response.
    pub fn from_response(raw: serde_json::Value, requested_model: &str) -> Result<Self> {
        let id = raw
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ConferentiError::Provider {
                provider: AGENT_SERVICE.into(),
                message: "creation response has no id".into(),
            })?
            .to_string();
        let model = raw
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(requested_model)
            .to_string();
        let name = raw.get("name").and_then(|v| v.as_str()).map(str::to_string);
        let created_at = raw
            .get("created_at")
            .and_then(|v| v.as_i64())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Ok(Self {
            id,
            model,
            name,
            created_at,
            raw,
        })
    }
}

/// External agent service used by the remote backend family.
#[async_trait]
pub trait RemoteAgentService: Send + Sync {
    fn service_name(&self) -> &str;

    async fn create_agent(&self, request: RemoteAgentRequest) -> Result<RemoteAgent>;
}

/// Agent service reached over REST (`POST {endpoint}/assistants`).
pub struct HttpAgentService {
    endpoint: String,
    api_key: String,
    api_version: String,
    client: reqwest::Client,
}

impl HttpAgentService {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: api_version.into(),
            client: shared_client().clone(),
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn assistants_url(&self) -> String {
        format!("{}/assistants", self.endpoint)
    }
}

#[async_trait]
impl RemoteAgentService for HttpAgentService {
    fn service_name(&self) -> &str {
        "agent-service"
    }

    async fn create_agent(&self, request: RemoteAgentRequest) -> Result<RemoteAgent> {
        debug!(
            model = %request.model,
            name = %request.name,
            endpoint = %self.endpoint,
            "creating remote agent"
        );

        let resp = self
            .client
            .post(self.assistants_url())
            .query(&[("api-version", self.api_version.as_str())])
            .headers(api_key_headers(&self.api_key))
            .json(&request.to_body())
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let raw: serde_json::Value = resp.json().await?;
        RemoteAgent::from_response(raw, &request.model)
    }
}
