//! Chat webhook integration
//!
//! The chat widget forwards each user message to a remote webhook and shows
//! the reply. Three pieces:
//! - [`WebhookClient`] performs the POST and reports a [`ChatOutcome`]
//! - [`reply`] turns a response body into display text
//! - [`ChatSession`] keeps the message list and allows one request at a time
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clientdash_core::chat::{ChatSession, WebhookClient};
//!
//! let client = WebhookClient::new(&config.chat)?;
//! let mut session = ChatSession::new();
//! let mut input = String::from("How many orders are pending?");
//!
//! if let Some(outbound) = session.submit(&mut input) {
//!     let outcome = client.send(&outbound.content, outbound.sent_at).await;
//!     session.complete(&outcome);
//! }
//! ```

mod client;
pub mod reply;
mod session;

pub use client::WebhookClient;
pub use reply::{unwrap_reply, ChatOutcome, ReplyPayload};
pub use session::{ChatSession, OutboundMessage};
