//! Core domain types for clientdash
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One client order row from the spreadsheet export |
//! | **Status** | Free-form delivery label on a record ("Delivered", "Pending", ...) |
//! | **Session** | One chat conversation, alive while the process runs |
//! | **Message** | One turn in a session, authored by the user or the assistant |
//!
//! Status labels stay opaque strings. [`KnownStatus`] only exists so the UI
//! can pick colours and progress for the labels it recognises; anything else
//! is still displayed verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Client records
// ============================================

/// One row of ingested spreadsheet data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client display name, never empty after ingestion
    pub client_name: String,
    /// Number of headshots ordered
    pub headshot_count: u32,
    /// Order value in the sheet's currency
    pub price: f64,
    /// Delivery status label, verbatim from the sheet
    pub status: String,
    /// Contact address, unvalidated
    pub email: String,
}

impl ClientRecord {
    /// Classify the status label, if it is one of the known values.
    pub fn known_status(&self) -> Option<KnownStatus> {
        KnownStatus::classify(&self.status)
    }

    /// Whether this order counts towards the completion rate.
    pub fn is_delivered(&self) -> bool {
        self.known_status() == Some(KnownStatus::Delivered)
    }

    /// Up to two uppercase initials taken from the client name.
    pub fn initials(&self) -> String {
        self.client_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Status labels the dashboard knows how to style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownStatus {
    Delivered,
    InProgress,
    Pending,
    Cancelled,
}

impl KnownStatus {
    /// Match a label exactly as it appears in the sheet.
    pub fn classify(label: &str) -> Option<Self> {
        match label {
            "Delivered" => Some(Self::Delivered),
            "In Progress" => Some(Self::InProgress),
            "Pending" => Some(Self::Pending),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Fraction of the delivery pipeline a status represents.
///
/// Delivered is complete, In Progress is two thirds, everything else
/// (including unknown labels) sits at one third.
pub fn delivery_progress(status: &str) -> f64 {
    match KnownStatus::classify(status) {
        Some(KnownStatus::Delivered) => 1.0,
        Some(KnownStatus::InProgress) => 2.0 / 3.0,
        _ => 1.0 / 3.0,
    }
}

// ============================================
// Chat
// ============================================

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Label shown next to the message
    pub fn display_name(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Assistant => "Assistant",
        }
    }
}

/// One turn in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique within the session
    pub id: String,
    /// Display text
    pub content: String,
    /// Author
    pub role: ChatRole,
    /// When the message was created locally
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time and a fresh id.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            role,
            sent_at: Utc::now(),
        }
    }
}
