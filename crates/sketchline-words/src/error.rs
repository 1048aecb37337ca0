//! Error types for word sources.

/// Why a word source could not supply words.
///
/// Never surfaced to players: [`load_word_pool`](crate::load_word_pool)
/// logs it and falls back to the built-in list.
#[derive(Debug, thiserror::Error)]
pub enum WordSourceError {
    /// The catalog could not be reached or its body could not be parsed.
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    /// The source did not answer in time.
    #[error("word source timed out after {0:?}")]
    TimedOut(std::time::Duration),

    /// The catalog answered but had no usable words.
    #[error("catalog is empty")]
    EmptyCatalog,
}
