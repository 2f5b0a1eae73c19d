//! Ingestion of the spreadsheet export into typed records
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  SheetSource    │ ──► │  SheetIngestor   │ ──► │  IngestResult   │
//! │ (HTTP / file)   │     │  csv::parse_sheet│     │ Vec<ClientRecord>│
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! Each ingestion builds a fresh record set. Callers replace their whole
//! snapshot with it; nothing is merged.
//!
//! ## Overlapping refreshes
//!
//! A refresh may be requested while an earlier fetch is still running. The
//! newest request wins: callers take a [`Generation`] from a
//! [`RefreshSequencer`] before starting, and only apply a result whose
//! generation is still current.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clientdash_core::Config;
//! use clientdash_core::ingest::{SheetIngestor, SheetSource};
//!
//! let config = Config::load()?;
//! let ingestor = SheetIngestor::new(SheetSource::from_config(&config.sheet)?);
//! let result = ingestor.ingest().await?;
//! println!("{} clients", result.records.len());
//! ```

pub mod csv;
mod source;

pub use csv::{parse_records, parse_sheet, ParsedSheet};
pub use source::{HttpSheetSource, SheetSource};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::ClientRecord;

/// Result of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestResult {
    /// Parsed records in sheet order
    pub records: Vec<ClientRecord>,
    /// Data lines seen after the header
    pub rows_seen: usize,
    /// Rows dropped for having no client name
    pub rows_skipped: usize,
    /// When the export finished downloading
    pub fetched_at: DateTime<Utc>,
}

/// Fetches the export and turns it into records.
#[derive(Debug, Clone)]
pub struct SheetIngestor {
    source: SheetSource,
}

impl SheetIngestor {
    /// Create an ingestor over the given source.
    pub fn new(source: SheetSource) -> Self {
        Self { source }
    }

    /// The configured source
    pub fn source(&self) -> &SheetSource {
        &self.source
    }

    /// Fetch and parse the export.
    ///
    /// Only transport failures are errors. Parsing itself never fails.
    pub async fn ingest(&self) -> Result<IngestResult> {
        tracing::debug!(source = %self.source.describe(), "Fetching sheet export");

        let text = self.source.fetch_text().await?;
        let fetched_at = Utc::now();
        let result = Self::from_text(&text, fetched_at);

        tracing::info!(
            records = result.records.len(),
            rows_seen = result.rows_seen,
            rows_skipped = result.rows_skipped,
            bytes = text.len(),
            "Sheet ingestion complete"
        );

        Ok(result)
    }

    /// Build a result from already-fetched text.
    pub fn from_text(text: &str, fetched_at: DateTime<Utc>) -> IngestResult {
        let ParsedSheet {
            records,
            rows_seen,
            rows_skipped,
        } = parse_sheet(text);

        IngestResult {
            records,
            rows_seen,
            rows_skipped,
            fetched_at,
        }
    }
}

/// Identifies one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Orders overlapping refreshes so the most recently started one wins.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    latest: u64,
    applied: Option<u64>,
}

impl RefreshSequencer {
    /// Create a sequencer with no refresh started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh. Any earlier generation becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Whether a result for `generation` should still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest && self.applied != Some(generation.0)
    }

    /// Mark a generation's result as applied. Returns false (and changes
    /// nothing) when the generation is stale or was already applied.
    pub fn accept(&mut self, generation: Generation) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.applied = Some(generation.0);
        true
    }

    /// Whether a started refresh has not yet delivered its result.
    pub fn is_pending(&self) -> bool {
        self.latest > 0 && self.applied != Some(self.latest)
    }

    /// Settle the current generation without applying data (e.g. it failed).
    pub fn settle(&mut self, generation: Generation) -> bool {
        self.accept(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_counts_rows() {
        let text = "Clients,Headshots,Price,Status,Email\nAsha,1,100,Delivered,a@x.io\n,2,5,Pending,\n";
        let result = SheetIngestor::from_text(text, Utc::now());
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.rows_seen, 2);
        assert_eq!(result.rows_skipped, 1);
    }

    #[test]
    fn test_sequencer_latest_wins() {
        let mut seq = RefreshSequencer::new();
        assert!(!seq.is_pending());

        let first = seq.begin();
        let second = seq.begin();
        assert!(seq.is_pending());

        // Earlier fetch completing late is discarded.
        assert!(!seq.accept(first));
        assert!(seq.is_pending());

        assert!(seq.accept(second));
        assert!(!seq.is_pending());
    }

    #[test]
    fn test_sequencer_applies_once() {
        let mut seq = RefreshSequencer::new();
        let generation = seq.begin();
        assert!(seq.accept(generation));
        assert!(!seq.accept(generation));
    }

    #[test]
    fn test_sequencer_stale_after_newer_begin() {
        let mut seq = RefreshSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));
        let _second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(!seq.settle(first));
    }
}
