//! # clientdash-core
//!
//! Core library for clientdash - a terminal dashboard over a client-orders
//! spreadsheet with an attached chat assistant.
//!
//! This library provides:
//! - Domain types for client records and chat messages
//! - Sheet ingestion (fetch + best-effort CSV parsing)
//! - Derived metrics and chart series
//! - Chat webhook client, reply unwrapping and session state
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Two independent pipelines feed the presentation layer:
//! - **Ingestion:** export text → [`ingest::csv`] → `Vec<ClientRecord>` → [`analytics`]
//! - **Chat:** user text → [`chat::WebhookClient`] → [`chat::reply`] → [`chat::ChatSession`]
//!
//! Parsing, metrics and reply unwrapping are pure and never fail. Only
//! configuration and the sheet transport report errors.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clientdash_core::analytics::DashboardMetrics;
//! use clientdash_core::ingest::parse_records;
//!
//! let csv = "Clients,Headshots,Price,Status,Email\nAsha,4,\"₹2,000\",Delivered,asha@example.com\n";
//! let records = parse_records(csv);
//! let metrics = DashboardMetrics::compute(&records);
//! assert_eq!(metrics.total_clients, 1);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use ingest::{IngestResult, SheetIngestor, SheetSource};
pub use types::*;

// Public modules
pub mod analytics;
pub mod chat;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
