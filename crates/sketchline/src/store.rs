//! REST persistence adapter.
//!
//! Writes room heartbeats and finished games to a PostgREST-style backend
//! (as served by Supabase):
//!
//! ```text
//! POST {url}/rest/v1/rooms          Prefer: resolution=merge-duplicates
//! POST {url}/rest/v1/game_history
//! ```

use std::time::Duration;

use serde::Serialize;
use sketchline_room::{GameRecord, GameStore, NoopStore, RoomActivity, StoreError};
use tracing::debug;

const ROOMS_TABLE: &str = "rooms";
const GAME_HISTORY_TABLE: &str = "game_history";

/// Deadline for a single write. Writes for a room are queued behind each other.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// A [`GameStore`] backed by the hosted REST API.
#[derive(Debug, Clone)]
pub struct RestStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: STORE_TIMEOUT,
        }
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        table: &str,
        row: &T,
        upsert: bool,
    ) -> Result<(), StoreError> {
        let mut request = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(row);
        if upsert {
            request = request.header("Prefer", "resolution=merge-duplicates");
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Request(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(table, "row written");
        Ok(())
    }
}

impl GameStore for RestStore {
    async fn record_activity(&self, activity: RoomActivity) -> Result<(), StoreError> {
        self.insert(ROOMS_TABLE, &activity, true).await
    }

    async fn record_game(&self, record: GameRecord) -> Result<(), StoreError> {
        self.insert(GAME_HISTORY_TABLE, &record, false).await
    }
}

/// The store selected by configuration.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Noop(NoopStore),
    Rest(RestStore),
}

impl GameStore for StoreBackend {
    async fn record_activity(&self, activity: RoomActivity) -> Result<(), StoreError> {
        match self {
            Self::Noop(store) => store.record_activity(activity).await,
            Self::Rest(store) => store.record_activity(activity).await,
        }
    }

    async fn record_game(&self, record: GameRecord) -> Result<(), StoreError> {
        match self {
            Self::Noop(store) => store.record_game(record).await,
            Self::Rest(store) => store.record_game(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let store = RestStore::new("https://x.supabase.co/", "anon");
        assert_eq!(store.table_url("rooms"), "https://x.supabase.co/rest/v1/rooms");
    }
}
