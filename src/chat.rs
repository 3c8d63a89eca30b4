//! Health chat: request building and streamed-response decoding
//!
//! Chat completions arrive as a server-sent-event style byte stream:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"}}]}
//! data: {"choices":[{"delta":{"content":"lo"}}]}
//! data: [DONE]
//! ```
//!
//! Chunk boundaries are arbitrary, so [`ChatStreamDecoder`] keeps the partial
//! line and any split UTF-8 sequence between calls.

use crate::analysis::ProfileContext;
use crate::types::{Averages, UserProfile};
use serde::{Deserialize, Serialize};

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Rolling lifestyle averages shared with the chat model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleContext {
    pub avg_sleep: f64,
    pub avg_exercise: f64,
    pub avg_steps: f64,
    pub avg_diet: f64,
    pub avg_stress: f64,
}

impl From<&Averages> for LifestyleContext {
    fn from(avg: &Averages) -> Self {
        Self {
            avg_sleep: avg.sleep,
            avg_exercise: avg.exercise,
            avg_steps: avg.steps,
            avg_diet: avg.diet,
            avg_stress: avg.stress,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthContext {
    pub profile: Option<ProfileContext>,
    pub lifestyle: Option<LifestyleContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub health_context: HealthContext,
}

impl ChatRequest {
    /// Lifestyle context is omitted until at least one log contributed
    pub fn new(
        messages: Vec<ChatMessage>,
        profile: Option<&UserProfile>,
        averages: Option<&Averages>,
    ) -> Self {
        Self {
            messages,
            health_context: HealthContext {
                profile: profile.map(ProfileContext::from),
                lifestyle: averages
                    .filter(|avg| avg.days > 0)
                    .map(LifestyleContext::from),
            },
        }
    }
}

/// One decoded stream event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Assistant text fragment
    Delta(String),
    /// End-of-stream marker seen
    Done,
    /// `data:` line whose payload was not valid JSON
    Malformed(String),
}

#[derive(Debug, Default, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Incremental decoder for a chat completion stream
#[derive(Debug, Default)]
pub struct ChatStreamDecoder {
    /// Decoded text not yet terminated by a newline
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
    done: bool,
}

impl ChatStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed raw bytes; returns events for every completed line
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }
        self.pending.extend_from_slice(chunk);
        self.decode_pending(false);
        self.drain_lines()
    }

    /// Feed already-decoded text
    pub fn push_str(&mut self, chunk: &str) -> Vec<StreamEvent> {
        self.push_bytes(chunk.as_bytes())
    }

    /// Flush a final line that was never newline-terminated
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.done {
            return Vec::new();
        }
        self.decode_pending(true);
        let mut events = self.drain_lines();
        if !self.done && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            events.extend(self.decode_line(&line));
        }
        events
    }

    fn decode_pending(&mut self, flush: bool) {
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    self.pending.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.buffer
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(len) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        None if flush => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            self.pending.clear();
                            return;
                        }
                        None => {
                            self.pending.drain(..valid);
                            return;
                        }
                    }
                }
            }
        }
    }

    fn drain_lines(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while !self.done {
            let Some(newline) = self.buffer.find('\n') else {
                break;
            };
            let line: String = self.buffer.drain(..=newline).collect();
            events.extend(self.decode_line(&line[..newline]));
        }
        if self.done {
            self.buffer.clear();
            self.pending.clear();
        }
        events
    }

    fn decode_line(&mut self, line: &str) -> Option<StreamEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with(':') || line.trim().is_empty() {
            return None;
        }

        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        if payload == DONE_MARKER {
            self.done = true;
            return Some(StreamEvent::Done);
        }

        match serde_json::from_str::<StreamChunk>(payload) {
            Ok(chunk) => chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content)
                .filter(|content| !content.is_empty())
                .map(StreamEvent::Delta),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed chat stream line");
                Some(StreamEvent::Malformed(payload.to_string()))
            }
        }
    }
}

/// Concatenate the text of all delta events
pub fn assemble(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            StreamEvent::Delta(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
