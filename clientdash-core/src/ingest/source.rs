//! Where the spreadsheet export comes from.

use std::path::PathBuf;

use crate::config::SheetConfig;
use crate::error::{Error, Result};

/// A place the raw CSV export can be read from.
#[derive(Debug, Clone)]
pub enum SheetSource {
    /// HTTP GET against the published export URL
    Http(HttpSheetSource),
    /// Local file, for offline use and tests
    File(PathBuf),
}

impl SheetSource {
    /// Build the HTTP source described by the configuration.
    pub fn from_config(config: &SheetConfig) -> Result<Self> {
        Ok(Self::Http(HttpSheetSource::new(config)?))
    }

    /// Human-readable location for logs and status lines
    pub fn describe(&self) -> String {
        match self {
            SheetSource::Http(source) => source.url.clone(),
            SheetSource::File(path) => path.display().to_string(),
        }
    }

    /// Read the whole export as text.
    pub async fn fetch_text(&self) -> Result<String> {
        match self {
            SheetSource::Http(source) => source.fetch_text().await,
            SheetSource::File(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
                Error::Sheet(format!("failed to read {}: {}", path.display(), e))
            }),
        }
    }
}

/// HTTP client for the published CSV export.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    url: String,
    http_client: reqwest::Client,
}

impl HttpSheetSource {
    /// Create a source from configuration.
    ///
    /// No timeout is applied unless `sheet.timeout_secs` is set.
    pub fn new(config: &SheetConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.trim().to_string(),
            http_client,
        })
    }

    /// Export URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the export. Non-success statuses are errors so that an HTML
    /// error page never gets parsed as data.
    pub async fn fetch_text(&self) -> Result<String> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::Sheet(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Sheet(format!("export returned {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Sheet(format!("failed to read export body: {}", e)))
    }
}
