//! Ollama local transport (native `/api/chat`).

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConferentiError, Result};
use crate::types::ChatMessage;

use super::http::{shared_client, status_to_error};
use super::{ChatChunk, ChatCompletion, ChatTransport, ChunkStream};

pub struct OllamaTransport {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaTransport {
    /// `base_url` is the server root (host:port), without any `/v1` suffix.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: shared_client().clone(),
        }
    }

    /// Use a dedicated client (e.g. one with a different timeout).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request_body(messages: &[ChatMessage], model: &str, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": stream,
        })
    }

    async fn post_chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let body = Self::build_request_body(messages, model, stream);
        let resp = self.client.post(self.chat_url()).json(&body).send().await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ChatTransport for OllamaTransport {
    fn transport_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, messages: &[ChatMessage], model: &str) -> Result<ChatCompletion> {
        debug!(model, url = %self.chat_url(), messages = messages.len(), "Ollama complete");

        let resp = self.post_chat(messages, model, false).await?;
        let data: OllamaChatResponse = resp.json().await?;
        if let Some(error) = data.error {
            return Err(ollama_error(error));
        }
        let message = data
            .message
            .ok_or_else(|| ConferentiError::api(200, "No message in Ollama response"))?;

        Ok(ChatCompletion::new(message.content))
    }

    async fn complete_streaming(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<ChunkStream> {
        debug!(model, url = %self.chat_url(), messages = messages.len(), "Ollama complete_streaming");

        let resp = self.post_chat(messages, model, true).await?;
        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;
            futures::pin_mut!(byte_stream);

            'read: while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        yield Err(ConferentiError::Network(e));
                        finished = true;
                        break 'read;
                    }
                };
                buffer.extend_from_slice(&bytes);

                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    match parse_stream_line(&line) {
                        Ok(None) => {}
                        Ok(Some(parsed)) => {
                            if !parsed.text.is_empty() {
                                yield Ok(ChatChunk::new(parsed.text));
                            }
                            if parsed.done {
                                finished = true;
                                break 'read;
                            }
                        }
                        Err(e) => {
                            yield Err(e);
                            finished = true;
                            break 'read;
                        }
                    }
                }
            }

            if !finished {
                // Last object may arrive without a trailing newline.
                match parse_stream_line(&buffer) {
                    Ok(Some(parsed)) => {
                        if !parsed.text.is_empty() {
                            yield Ok(ChatChunk::new(parsed.text));
                        }
                        if !parsed.done {
                            yield Err(ConferentiError::Stream(
                                "Ollama stream ended before the final chunk".into(),
                            ));
                        }
                    }
                    Ok(None) => {
                        yield Err(ConferentiError::Stream(
                            "Ollama stream ended before the final chunk".into(),
                        ));
                    }
                    Err(e) => {
                        yield Err(e);
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, PartialEq)]
struct StreamLine {
    text: String,
    done: bool,
}

/// Parse one NDJSON line. Blank lines yield `None`.
fn parse_stream_line(line: &[u8]) -> Result<Option<StreamLine>> {
    let text = String::from_utf8_lossy(line);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let data: OllamaChatResponse = serde_json::from_str(trimmed)?;
    if let Some(error) = data.error {
        return Err(ollama_error(error));
    }
    Ok(Some(StreamLine {
        text: data.message.map(|m| m.content).unwrap_or_default(),
        done: data.done,
    }))
}

fn ollama_error(message: String) -> ConferentiError {
    ConferentiError::Provider {
        provider: "ollama".into(),
        message,
    }
}
