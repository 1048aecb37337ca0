//! Server configuration from the environment.

use std::time::Duration;

use sketchline_room::{NoopStore, RoomConfig};
use sketchline_words::{CatalogClient, WordCatalog};
use tracing::info;

use crate::{RestStore, SketchlineError, StoreBackend};

/// Listen address used when `SKETCHLINE_BIND` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

/// Credentials for the hosted backend that serves the word catalog and
/// stores room activity and game history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Everything the binary needs to start a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub room: RoomConfig,
    /// `None` selects the built-in word list and a no-op store.
    pub supabase: Option<SupabaseConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            room: RoomConfig::default(),
            supabase: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment, after loading `.env` if present.
    ///
    /// | variable | effect |
    /// |---|---|
    /// | `SKETCHLINE_BIND` | listen address |
    /// | `SKETCHLINE_TOTAL_ROUNDS` | rounds per game |
    /// | `SKETCHLINE_ROUND_SECS` | drawing time per round |
    /// | `SUPABASE_URL`, `SUPABASE_ANON_KEY` | hosted word catalog and store |
    ///
    /// # Errors
    /// Returns [`SketchlineError::Config`] if a numeric variable does not
    /// parse.
    pub fn from_env() -> Result<Self, SketchlineError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "loaded .env");
        }
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable lookup. Blank values count as
    /// unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self, SketchlineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(addr) = get("SKETCHLINE_BIND") {
            config.bind_addr = addr;
        }
        if let Some(rounds) = get("SKETCHLINE_TOTAL_ROUNDS") {
            config.room.total_rounds = parse_number("SKETCHLINE_TOTAL_ROUNDS", &rounds)?;
        }
        if let Some(secs) = get("SKETCHLINE_ROUND_SECS") {
            config.room.round_duration =
                Duration::from_secs(parse_number("SKETCHLINE_ROUND_SECS", &secs)?);
        }
        config.supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            _ => None,
        };
        Ok(config)
    }

    /// The word source rooms draw their pools from.
    pub fn word_catalog(&self, http: &reqwest::Client) -> WordCatalog {
        match &self.supabase {
            Some(supabase) => WordCatalog::Remote(CatalogClient::with_client(
                http.clone(),
                &supabase.url,
                &supabase.anon_key,
            )),
            None => WordCatalog::default(),
        }
    }

    /// Where room activity and game results are written.
    pub fn store(&self, http: &reqwest::Client) -> StoreBackend {
        match &self.supabase {
            Some(supabase) => StoreBackend::Rest(RestStore::with_client(
                http.clone(),
                &supabase.url,
                &supabase.anon_key,
            )),
            None => StoreBackend::Noop(NoopStore),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, SketchlineError> {
    value
        .parse()
        .map_err(|_| SketchlineError::Config(format!("{key} must be a positive number, got {value:?}")))
}
