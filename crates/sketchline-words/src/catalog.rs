//! HTTP client for the hosted word catalog.
//!
//! The catalog is a PostgREST-style endpoint (as served by Supabase):
//!
//! ```text
//! GET {base_url}/rest/v1/words?select=word&limit=500
//! apikey: <key>
//! Authorization: Bearer <key>
//!
//! [{"word": "apple"}, {"word": "pizza"}, ...]
//! ```

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{WordSource, WordSourceError};

/// Upper bound on the words requested from the catalog.
pub const CATALOG_LIMIT: usize = 500;

/// Per-request deadline, covering connect, headers and body.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Deserialize)]
struct WordRow {
    word: String,
}

/// Fetches words from the hosted catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limit: usize,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Reuses an existing HTTP client (connection pool shared with the
    /// game store).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            limit: CATALOG_LIMIT,
            timeout: CATALOG_TIMEOUT,
        }
    }

    /// Overrides the request limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Overrides the request deadline.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The full request URL.
    pub fn url(&self) -> String {
        format!(
            "{}/rest/v1/words?select=word&limit={}",
            self.base_url, self.limit
        )
    }
}

impl WordSource for CatalogClient {
    async fn fetch_words(&self) -> Result<Vec<String>, WordSourceError> {
        let response = self
            .http
            .get(self.url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WordSourceError::Status(status));
        }

        let rows: Vec<WordRow> = response.json().await?;
        debug!(count = rows.len(), "word catalog fetched");
        if rows.is_empty() {
            return Err(WordSourceError::EmptyCatalog);
        }
        Ok(rows.into_iter().map(|row| row.word).collect())
    }
}
