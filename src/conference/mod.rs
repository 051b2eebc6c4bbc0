//! Conference records and the store boundary used by the advisor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A speaker record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Speaker {
    pub id: String,
    pub name: String,
    pub position: String,
    pub company: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub expertise: Vec<String>,
    pub session_ids: Vec<String>,
}

/// A conference session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub theme: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "audience")]
    pub target_audience: Option<String>,
    pub topics: Vec<String>,
    pub duration_minutes: Option<u32>,
}

/// Read access to speakers and sessions.
///
/// Lookups by ID return `Ok(None)` for absent records; turning that into a
/// `NotFound` error is the caller's decision.
#[async_trait]
pub trait ConferenceStore: Send + Sync {
    async fn speaker(&self, id: &str) -> Result<Option<Speaker>>;

    async fn speakers(&self, limit: usize) -> Result<Vec<Speaker>>;

    async fn speakers_for_session(&self, session_id: &str) -> Result<Vec<Speaker>>;

    /// Case-insensitive match on name, position or company.
    async fn search_speakers(&self, query: &str) -> Result<Vec<Speaker>>;

    async fn session(&self, id: &str) -> Result<Option<Session>>;
}

/// Store backed by in-memory vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    speakers: Vec<Speaker>,
    sessions: Vec<Session>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speaker(mut self, speaker: Speaker) -> Self {
        self.speakers.push(speaker);
        self
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.sessions.push(session);
        self
    }
}

#[async_trait]
impl ConferenceStore for InMemoryStore {
    async fn speaker(&self, id: &str) -> Result<Option<Speaker>> {
        Ok(self.speakers.iter().find(|s| s.id == id).cloned())
    }

    async fn speakers(&self, limit: usize) -> Result<Vec<Speaker>> {
        Ok(self.speakers.iter().take(limit).cloned().collect())
    }

    async fn speakers_for_session(&self, session_id: &str) -> Result<Vec<Speaker>> {
        Ok(self
            .speakers
            .iter()
            .filter(|s| s.session_ids.iter().any(|id| id == session_id))
            .cloned()
            .collect())
    }

    async fn search_speakers(&self, query: &str) -> Result<Vec<Speaker>> {
        let needle = query.to_lowercase();
        Ok(self
            .speakers
            .iter()
            .filter(|s| {
                [&s.name, &s.position, &s.company]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn session(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.iter().find(|s| s.id == id).cloned())
    }
}
