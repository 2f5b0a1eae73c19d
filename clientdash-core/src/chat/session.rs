//! Chat session state
//!
//! A session is strictly sequential:
//!
//! ```text
//!   Idle ──submit(non-empty)──► AwaitingResponse ──complete(outcome)──► Idle
//! ```
//!
//! Submitting while awaiting does nothing. Completing appends exactly one
//! assistant message. There is no retry and no cancellation; the caller
//! drives the actual network call between `submit` and `complete`.

use chrono::{DateTime, Utc};

use crate::types::{ChatMessage, ChatRole};

use super::reply::ChatOutcome;

/// Where the session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ChatState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// A user message accepted for sending.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Id of the user message already appended to the session
    pub message_id: String,
    /// Trimmed text to post
    pub content: String,
    /// Timestamp posted alongside the text
    pub sent_at: DateTime<Utc>,
}

/// Ordered, append-only conversation plus the request guard.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    state: ChatState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the input if the session is idle and the text is non-blank.
    ///
    /// On acceptance the user message is appended, `input` is cleared and the
    /// session starts awaiting. Otherwise nothing changes, including `input`.
    pub fn submit(&mut self, input: &mut String) -> Option<OutboundMessage> {
        if self.state == ChatState::AwaitingResponse {
            tracing::debug!("Ignoring chat submit while a request is outstanding");
            return None;
        }

        let content = input.trim();
        if content.is_empty() {
            return None;
        }

        let message = ChatMessage::new(ChatRole::User, content);
        let outbound = OutboundMessage {
            message_id: message.id.clone(),
            content: message.content.clone(),
            sent_at: message.sent_at,
        };

        self.messages.push(message);
        input.clear();
        self.state = ChatState::AwaitingResponse;

        Some(outbound)
    }

    /// Record how the outstanding request ended and return to idle.
    ///
    /// Returns the appended assistant message, or `None` if nothing was
    /// outstanding.
    pub fn complete(&mut self, outcome: &ChatOutcome) -> Option<&ChatMessage> {
        if self.state != ChatState::AwaitingResponse {
            tracing::warn!("Chat reply arrived with no request outstanding");
            return None;
        }

        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, outcome.display_text()));
        self.state = ChatState::Idle;
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == ChatState::AwaitingResponse
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
