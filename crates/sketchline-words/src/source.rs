//! The [`WordSource`] trait and the sources the server ships with.

use std::future::Future;

use crate::{CatalogClient, WordSourceError, default_words};

/// Supplies the candidate words for a new room.
///
/// Called once per room, when the room is created. Implementations may
/// fail freely; the caller falls back to the built-in list.
///
/// ```rust
/// use sketchline_words::{WordSource, WordSourceError};
///
/// struct Fruit;
///
/// impl WordSource for Fruit {
///     async fn fetch_words(&self) -> Result<Vec<String>, WordSourceError> {
///         Ok(vec!["apple".into(), "pear".into(), "plum".into()])
///     }
/// }
/// ```
pub trait WordSource: Send + Sync + 'static {
    /// Fetches a bounded batch of words.
    fn fetch_words(&self) -> impl Future<Output = Result<Vec<String>, WordSourceError>> + Send;
}

/// A fixed, in-memory word table.
#[derive(Debug, Clone)]
pub struct StaticWords(Vec<String>);

impl StaticWords {
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(words.into_iter().map(Into::into).collect())
    }

    pub fn words(&self) -> &[String] {
        &self.0
    }
}

impl Default for StaticWords {
    /// The built-in list.
    fn default() -> Self {
        Self(default_words())
    }
}

impl WordSource for StaticWords {
    async fn fetch_words(&self) -> Result<Vec<String>, WordSourceError> {
        Ok(self.0.clone())
    }
}

/// The word source selected by configuration: the built-in table, or a
/// remote catalog when credentials are present.
#[derive(Debug, Clone)]
pub enum WordCatalog {
    Builtin(StaticWords),
    Remote(CatalogClient),
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self::Builtin(StaticWords::default())
    }
}

impl WordSource for WordCatalog {
    async fn fetch_words(&self) -> Result<Vec<String>, WordSourceError> {
        match self {
            Self::Builtin(words) => words.fetch_words().await,
            Self::Remote(client) => client.fetch_words().await,
        }
    }
}
