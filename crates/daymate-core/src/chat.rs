//! Chat session: message history plus reply generation.
//!
//! Replies come from the external backend when one is configured, or from
//! the built-in [`Responder`] after a simulated network delay. A failed
//! backend call never surfaces as an error: the session answers with
//! [`FALLBACK_REPLY`] and [`FALLBACK_SUGGESTIONS`] instead.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::assistant::{Reply, Responder};
use crate::backend::BackendClient;
use crate::error::BackendError;
use crate::storage::Config;

pub const GREETING: &str = "Hello! I'm your AI productivity assistant. How can I help you today?";

pub const FALLBACK_REPLY: &str = "I'm having trouble connecting to my AI brain right now. Please make sure the backend is running!";

pub const FALLBACK_SUGGESTIONS: [&str; 3] = ["Try again", "Check connection", "Restart backend"];

pub const QUICK_SUGGESTIONS: [&str; 6] = [
    "Help me plan my day",
    "What should I focus on?",
    "Track my habits",
    "Set a reminder",
    "How's my productivity?",
    "Give me motivation",
];

/// Reply used when the backend cannot be reached.
pub fn fallback_reply() -> Reply {
    Reply {
        text: FALLBACK_REPLY.to_string(),
        suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_suggestions() -> Vec<String> {
    QUICK_SUGGESTIONS[..3].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Message {
    fn new(text: impl Into<String>, is_user: bool, suggestions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
            suggestions,
        }
    }
}

pub struct ChatSession {
    messages: Vec<Message>,
    backend: Option<BackendClient>,
    responder: Responder,
    min_delay: Duration,
    max_delay: Duration,
    history_len: usize,
}

impl ChatSession {
    /// Session answered by the built-in responder.
    pub fn local(responder: Responder) -> Self {
        Self {
            messages: vec![Message::new(GREETING, false, default_suggestions())],
            backend: None,
            responder,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            history_len: 5,
        }
    }

    /// Session answered by `backend`.
    pub fn remote(backend: BackendClient, responder: Responder) -> Self {
        Self {
            backend: Some(backend),
            ..Self::local(responder)
        }
    }

    /// Build from configuration: backend when `assistant.use_backend` is
    /// set, otherwise the local responder with the configured delay.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let responder = Responder::from_seed(config.assistant.seed);
        let session = if config.assistant.use_backend {
            Self::remote(BackendClient::new(config.backend.clone())?, responder)
        } else {
            Self::local(responder)
        };
        let (min_delay, max_delay) = config.assistant.delay_range();
        Ok(session
            .with_delay(min_delay, max_delay)
            .with_history_len(config.assistant.history_len))
    }

    /// Simulated latency for local replies, drawn uniformly per message.
    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min.min(max);
        self.max_delay = min.max(max);
        self
    }

    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_remote(&self) -> bool {
        self.backend.is_some()
    }

    /// Replace the greeting's chips with the backend's starter suggestions.
    ///
    /// Keeps the built-in chips when there is no backend or the request
    /// fails. Returns the chips now attached to the greeting.
    pub async fn load_initial_suggestions(&mut self) -> Vec<String> {
        if let Some(backend) = &self.backend {
            match backend.suggestions().await {
                Ok(suggestions) => {
                    if let Some(greeting) = self.messages.first_mut() {
                        greeting.suggestions = suggestions;
                    }
                }
                Err(e) => debug!(error = %e, "using default suggestions"),
            }
        }
        self.messages
            .first()
            .map(|m| m.suggestions.clone())
            .unwrap_or_default()
    }

    /// Send `text` using the local clock for time-of-day replies.
    pub async fn send(&mut self, text: &str) -> Option<Reply> {
        self.send_at(text, Local::now().time()).await
    }

    /// Send `text` and record both sides of the exchange.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send_at(&mut self, text: &str, now: NaiveTime) -> Option<Reply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let skip = self.messages.len().saturating_sub(self.history_len);
        let history: Vec<String> = self.messages[skip..].iter().map(|m| m.text.clone()).collect();
        self.messages.push(Message::new(text, true, Vec::new()));

        let reply = match &self.backend {
            Some(backend) => match backend.chat(text, &history).await {
                Ok(resp) => Reply {
                    text: resp.response,
                    suggestions: resp.suggestions.unwrap_or_default(),
                },
                Err(e) => {
                    warn!(error = %e, "chat backend unavailable, using fallback reply");
                    fallback_reply()
                }
            },
            None => {
                let ms = self.responder.jitter(
                    self.min_delay.as_millis() as u64,
                    self.max_delay.as_millis() as u64,
                );
                if ms > 0 {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                }
                self.responder.respond(text, now)
            }
        };

        self.messages
            .push(Message::new(reply.text.clone(), false, reply.suggestions.clone()));
        Some(reply)
    }
}
