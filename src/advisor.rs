//! Speaker planning operations backed by one-shot agents.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::backend::AgentClient;
use crate::conference::{ConferenceStore, Session, Speaker};
use crate::error::{ConferentiError, Result};
use crate::prompts::{
    GenerateSpeakerBio, MatchSpeakerToSessions, SuggestSpeakerTopics, SuggestSpeakers,
};
use crate::types::TurnStatus;

/// Largest number of suggestions one request may ask for.
pub const MAX_SUGGESTIONS: usize = 20;

/// Session length assumed when a session record has none.
pub const DEFAULT_SESSION_MINUTES: u32 = 45;

const INDUSTRY: &str = "Technology";
const PLANNER_INSTRUCTIONS: &str = "You are a helpful conference planning assistant.";
const SUGGESTER_INSTRUCTIONS: &str = "You are a helpful conference planning assistant. \
     Provide clear, actionable speaker suggestions.";
const MATCHER_INSTRUCTIONS: &str = "You are a helpful conference planning assistant. \
     Match speakers to sessions effectively.";
const TOPICS_INSTRUCTIONS: &str = "You are a helpful conference planning assistant. \
     Suggest session topics that fit the speaker.";
const BIO_INSTRUCTIONS: &str = "You are a professional biography writer.";

/// Runs speaker planning prompts against fresh agents.
///
/// Every operation creates its own agent, so calls never share history.
#[derive(Clone)]
pub struct SpeakerAdvisor {
    client: AgentClient,
    store: Arc<dyn ConferenceStore>,
}

impl SpeakerAdvisor {
    pub fn new(client: AgentClient, store: Arc<dyn ConferenceStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &AgentClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn ConferenceStore> {
        &self.store
    }

    /// Suggest speakers for a theme without a stored session.
    pub async fn suggest_speakers(
        &self,
        theme: &str,
        topics: &[String],
        target_audience: &str,
        count: usize,
    ) -> Result<String> {
        check_count(count)?;
        let prompt = SuggestSpeakers {
            session_theme: theme,
            target_audience,
            industry: INDUSTRY,
            topics: &topics.join(", "),
            number_of_speakers: count,
        }
        .render();
        self.ask("speaker_suggester_general", PLANNER_INSTRUCTIONS, prompt)
            .await
    }

    /// Suggest speakers for a stored session.
    pub async fn suggest_speakers_for_session(
        &self,
        session_id: &str,
        count: usize,
    ) -> Result<String> {
        check_count(count)?;
        let session = self.require_session(session_id).await?;

        let topics = if session.topics.is_empty() {
            "General Topics".to_string()
        } else {
            session.topics.join(", ")
        };
        let prompt = SuggestSpeakers {
            session_theme: session.theme.as_deref().unwrap_or("General Technology"),
            target_audience: session.target_audience.as_deref().unwrap_or("Professionals"),
            industry: INDUSTRY,
            topics: &topics,
            number_of_speakers: count,
        }
        .render();
        self.ask("speaker_suggester", SUGGESTER_INSTRUCTIONS, prompt)
            .await
    }

    /// Write a third-person biography from the speaker's record.
    pub async fn generate_speaker_bio(&self, speaker_id: &str) -> Result<String> {
        let speaker = self.require_speaker(speaker_id).await?;
        let titles = self.session_names(&speaker.session_ids).await?;
        let titles = if titles.is_empty() {
            "None yet".to_string()
        } else {
            titles.join(", ")
        };

        let prompt = GenerateSpeakerBio {
            speaker_name: &speaker.name,
            position: &speaker.position,
            company: &speaker.company,
            email: speaker.email.as_deref().unwrap_or(""),
            current_bio: non_blank(speaker.bio.as_deref()).unwrap_or("None provided"),
            session_titles: &titles,
        }
        .render();
        self.ask("bio_generator", BIO_INSTRUCTIONS, prompt).await
    }

    /// Suggest topics a speaker could present in a session.
    pub async fn suggest_speaker_topics(
        &self,
        speaker_id: &str,
        session_id: &str,
        count: usize,
    ) -> Result<String> {
        check_count(count)?;
        let speaker = self.require_speaker(speaker_id).await?;
        let session = self.require_session(session_id).await?;

        let prompt = SuggestSpeakerTopics {
            speaker_name: &speaker.name,
            speaker_expertise: &expertise(&speaker),
            speaker_background: speaker.bio.as_deref().unwrap_or(""),
            recent_work: &speaker.company,
            session_name: &session.name,
            target_audience: session.target_audience.as_deref().unwrap_or(""),
            session_duration: session.duration_minutes.unwrap_or(DEFAULT_SESSION_MINUTES),
            focus_areas: &session.topics.join(", "),
            number_of_topics: count,
        }
        .render();
        self.ask("speaker_topic_suggester", TOPICS_INSTRUCTIONS, prompt)
            .await
    }

    /// Rank candidate sessions for a speaker. Unknown session IDs are skipped.
    pub async fn match_speaker_to_sessions(
        &self,
        speaker_id: &str,
        session_ids: &[String],
    ) -> Result<String> {
        let speaker = self.require_speaker(speaker_id).await?;

        let mut candidates = Vec::with_capacity(session_ids.len());
        for id in session_ids {
            match self.store.session(id).await? {
                Some(session) => candidates.push(session),
                None => debug!(session = %id, "skipping unknown session"),
            }
        }

        let previous = self.session_names(&speaker.session_ids).await?;
        let previous = if previous.is_empty() {
            "None".to_string()
        } else {
            previous.join(", ")
        };
        let session_topics = candidates
            .iter()
            .map(summarize_session)
            .collect::<Vec<_>>()
            .join("\n");
        let session_names = candidates
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = MatchSpeakerToSessions {
            speaker_name: &speaker.name,
            speaker_expertise: &expertise(&speaker),
            speaker_background: speaker.bio.as_deref().unwrap_or(""),
            previous_topics: &previous,
            session_topics: &session_topics,
            session_name: &session_names,
        }
        .render();
        self.ask("speaker_suggester_match_sessions", MATCHER_INSTRUCTIONS, prompt)
            .await
    }

    async fn ask(&self, name: &str, instructions: &str, prompt: String) -> Result<String> {
        let mut agent = self.client.create_local_agent(name, instructions).await?;
        debug!(agent = %name, model = %agent.model(), "running advisor prompt");

        let result = agent.run(prompt).await;
        match result.status {
            TurnStatus::Completed => Ok(result.content.unwrap_or_default()),
            _ => Err(ConferentiError::Provider {
                provider: "agent".into(),
                message: result
                    .error
                    .unwrap_or_else(|| "agent returned no content".into()),
            }),
        }
    }

    async fn require_speaker(&self, id: &str) -> Result<Speaker> {
        self.store
            .speaker(id)
            .await?
            .ok_or_else(|| ConferentiError::not_found("speaker", id))
    }

    async fn require_session(&self, id: &str) -> Result<Session> {
        self.store
            .session(id)
            .await?
            .ok_or_else(|| ConferentiError::not_found("session", id))
    }

    async fn session_names(&self, ids: &[String]) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for id in ids {
            if let Some(session) = self.store.session(id).await? {
                names.push(session.name);
            }
        }
        Ok(names)
    }
}

impl fmt::Debug for SpeakerAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeakerAdvisor")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

fn check_count(count: usize) -> Result<()> {
    if (1..=MAX_SUGGESTIONS).contains(&count) {
        Ok(())
    } else {
        Err(ConferentiError::InvalidArgument(format!(
            "count must be between 1 and {MAX_SUGGESTIONS}, got {count}"
        )))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn expertise(speaker: &Speaker) -> String {
    if speaker.expertise.is_empty() {
        speaker.position.clone()
    } else {
        speaker.expertise.join(", ")
    }
}

fn summarize_session(session: &Session) -> String {
    let description = session.description.as_deref().unwrap_or("");
    let short: String = description.chars().take(100).collect();
    let ellipsis = if short.len() < description.len() { "..." } else { "" };
    format!(" - {}: ({short}{ellipsis})", session.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_bounds_are_inclusive() {
        assert!(check_count(1).is_ok());
        assert!(check_count(MAX_SUGGESTIONS).is_ok());
        assert!(matches!(
            check_count(0),
            Err(ConferentiError::InvalidArgument(_))
        ));
        assert!(check_count(MAX_SUGGESTIONS + 1).is_err());
    }

    #[test]
    fn expertise_falls_back_to_position() {
        let mut speaker = Speaker {
            position: "Staff Engineer".into(),
            ..Default::default()
        };
        assert_eq!(expertise(&speaker), "Staff Engineer");

        speaker.expertise = vec!["Rust".into(), "Kubernetes".into()];
        assert_eq!(expertise(&speaker), "Rust, Kubernetes");
    }

    #[test]
    fn session_summary_truncates_long_descriptions() {
        let session = Session {
            name: "Deep Dive".into(),
            description: Some("x".repeat(150)),
            ..Default::default()
        };
        let summary = summarize_session(&session);
        assert!(summary.starts_with(" - Deep Dive: ("));
        assert!(summary.ends_with("...)"));
        assert_eq!(summary.matches('x').count(), 100);

        let short = Session {
            name: "Intro".into(),
            description: Some("Basics".into()),
            ..Default::default()
        };
        assert_eq!(summarize_session(&short), " - Intro: (Basics)");
    }
}
