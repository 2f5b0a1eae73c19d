//! Turning a webhook response into the assistant's display text.
//!
//! Webhook providers disagree on reply shape: some send `{"output": "..."}`,
//! some a bare JSON string, some a one-element list, some plain text. The
//! body is first classified into a [`ReplyPayload`], then cleaned of one
//! layer of list brackets and string quotes.

use serde_json::Value;

/// Object keys probed for the reply text, in priority order.
pub const CANDIDATE_FIELDS: [&str; 4] = ["output", "response", "message", "text"];

/// Shown when the webhook answers with a non-success status.
pub const REJECTED_FALLBACK: &str = "Sorry, I couldn't process your request.";

/// Shown when the webhook cannot be reached at all.
pub const CONNECT_FALLBACK: &str = "Failed to connect to the server. Please try again.";

/// Where the working text of a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
    /// Value of the first candidate field found in a JSON object
    Recognized(String),
    /// The body itself (not JSON, not an object, or no candidate field)
    RawFallback(String),
}

impl ReplyPayload {
    /// Classify a response body.
    ///
    /// The first candidate field holding a truthy value wins; `null`,
    /// `false`, `0` and `""` count as absent. Only a string winner is
    /// recognized. A winning number, list or object makes the whole body the
    /// fallback text.
    pub fn from_body(body: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
            return Self::RawFallback(body.to_string());
        };

        let winner = CANDIDATE_FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find(|value| is_truthy(value));

        match winner {
            Some(Value::String(text)) => Self::Recognized(text.clone()),
            _ => Self::RawFallback(body.to_string()),
        }
    }

    /// The uncleaned working text
    pub fn text(&self) -> &str {
        match self {
            Self::Recognized(text) | Self::RawFallback(text) => text,
        }
    }

    /// Cleaned text ready for display.
    pub fn display_text(&self) -> String {
        clean_reply_text(self.text())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strip one leading `[` and one trailing `]`, then one leading and one
/// trailing `"`, then surrounding whitespace. Each strip is independent, so a
/// lone opening bracket is removed even without its partner.
pub fn clean_reply_text(text: &str) -> String {
    let text = text.strip_prefix('[').unwrap_or(text);
    let text = text.strip_suffix(']').unwrap_or(text);
    let text = text.strip_prefix('"').unwrap_or(text);
    let text = text.strip_suffix('"').unwrap_or(text);
    text.trim().to_string()
}

/// Classify and clean a successful response body in one step.
pub fn unwrap_reply(body: &str) -> String {
    ReplyPayload::from_body(body).display_text()
}

/// How one webhook exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Success status with a body
    Replied(ReplyPayload),
    /// The webhook answered with a non-success status
    Rejected { status: u16 },
    /// The request never completed (DNS, refused, timeout, broken body)
    ConnectFailed { reason: String },
}

impl ChatOutcome {
    /// Build the outcome for a completed HTTP response.
    ///
    /// The body is ignored entirely when the status is not a success.
    pub fn from_response(status: u16, body: &str) -> Self {
        if (200..300).contains(&status) {
            Self::Replied(ReplyPayload::from_body(body))
        } else {
            Self::Rejected { status }
        }
    }

    /// Text of the assistant message this outcome produces.
    pub fn display_text(&self) -> String {
        match self {
            Self::Replied(payload) => payload.display_text(),
            Self::Rejected { .. } => REJECTED_FALLBACK.to_string(),
            Self::ConnectFailed { .. } => CONNECT_FALLBACK.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Replied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_field() {
        assert_eq!(unwrap_reply(r#"{"output":"hello"}"#), "hello");
        assert_eq!(
            ReplyPayload::from_body(r#"{"output":"hello"}"#),
            ReplyPayload::Recognized("hello".to_string())
        );
    }

    #[test]
    fn test_field_priority() {
        let body = r#"{"text":"t","message":"m","response":"r"}"#;
        assert_eq!(unwrap_reply(body), "r");
        assert_eq!(unwrap_reply(r#"{"text":"only text"}"#), "only text");
        assert_eq!(unwrap_reply(r#"{"message":" padded "}"#), "padded");
    }

    #[test]
    fn test_falsy_fields_fall_through() {
        assert_eq!(unwrap_reply(r#"{"output":"","response":"r"}"#), "r");
        assert_eq!(unwrap_reply(r#"{"output":null,"text":"t"}"#), "t");
        assert_eq!(unwrap_reply(r#"{"output":0,"text":"t"}"#), "t");
        assert_eq!(unwrap_reply(r#"{"output":0.0,"text":"t"}"#), "t");
        assert_eq!(unwrap_reply(r#"{"output":false,"text":"t"}"#), "t");
    }

    #[test]
    fn test_non_string_winner_falls_back_to_body() {
        let body = r#"{"output":["hi"]}"#;
        assert_eq!(
            ReplyPayload::from_body(body),
            ReplyPayload::RawFallback(body.to_string())
        );
        assert_eq!(unwrap_reply(body), body);

        // A truthy non-string shadows later string fields.
        let body = r#"{"output":42,"text":"t"}"#;
        assert_eq!(unwrap_reply(body), body);
        let body = r#"{"response":true,"message":"m"}"#;
        assert_eq!(unwrap_reply(body), body);
        let body = r#"{"output":{},"text":"t"}"#;
        assert_eq!(unwrap_reply(body), body);
    }

    #[test]
    fn test_list_falls_back_to_raw_then_strips() {
        assert_eq!(
            ReplyPayload::from_body(r#"["hi"]"#),
            ReplyPayload::RawFallback(r#"["hi"]"#.to_string())
        );
        assert_eq!(unwrap_reply(r#"["hi"]"#), "hi");
    }

    #[test]
    fn test_quoted_string() {
        assert_eq!(unwrap_reply(r#""quoted""#), "quoted");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(unwrap_reply("plain text"), "plain text");
        assert_eq!(unwrap_reply("  spaced out \n"), "spaced out");
    }

    #[test]
    fn test_object_without_candidates_is_raw() {
        let body = r#"{"answer":"nope"}"#;
        assert_eq!(
            ReplyPayload::from_body(body),
            ReplyPayload::RawFallback(body.to_string())
        );
        assert_eq!(unwrap_reply(body), body);
    }

    #[test]
    fn test_clean_strips_one_layer_each() {
        assert_eq!(clean_reply_text("[[x]]"), "[x]");
        assert_eq!(clean_reply_text("\"\"x\"\""), "\"x\"");
        assert_eq!(clean_reply_text("[only open"), "only open");
        assert_eq!(clean_reply_text("only close]"), "only close");
        assert_eq!(clean_reply_text("\"half"), "half");
        assert_eq!(clean_reply_text(""), "");
        assert_eq!(clean_reply_text("[]"), "");
    }

    #[test]
    fn test_strip_happens_before_trim() {
        // Leading whitespace shields the bracket from stripping.
        assert_eq!(clean_reply_text(" [x]"), "[x");
    }

    #[test]
    fn test_non_success_status_ignores_body() {
        let outcome = ChatOutcome::from_response(500, r#"{"output":"hello"}"#);
        assert_eq!(outcome, ChatOutcome::Rejected { status: 500 });
        assert_eq!(outcome.display_text(), REJECTED_FALLBACK);
        assert!(!outcome.is_success());

        let outcome = ChatOutcome::from_response(404, "");
        assert_eq!(outcome.display_text(), REJECTED_FALLBACK);
    }

    #[test]
    fn test_success_status_unwraps_body() {
        let outcome = ChatOutcome::from_response(200, r#"{"output":"hello"}"#);
        assert!(outcome.is_success());
        assert_eq!(outcome.display_text(), "hello");
    }

    #[test]
    fn test_connect_failure_text() {
        let outcome = ChatOutcome::ConnectFailed {
            reason: "connection refused".to_string(),
        };
        assert_eq!(outcome.display_text(), CONNECT_FALLBACK);
    }
}
