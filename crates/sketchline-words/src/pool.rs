//! Building a room's word pool and drawing options from it.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::{WordSource, WordSourceError, default_words};

/// How long a room creation waits for its word source.
pub const WORD_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches words from `source`, falling back to the built-in list.
///
/// Words are trimmed; blanks and case-insensitive duplicates are dropped
/// so options drawn from the pool are always distinct. A failing source
/// or one that yields nothing usable is logged and replaced, never
/// surfaced. A source that takes longer than [`WORD_FETCH_TIMEOUT`]
/// counts as failing.
pub async fn load_word_pool<W: WordSource>(source: &W) -> Vec<String> {
    load_word_pool_within(source, WORD_FETCH_TIMEOUT).await
}

/// [`load_word_pool`] with an explicit deadline.
pub async fn load_word_pool_within<W: WordSource>(source: &W, limit: Duration) -> Vec<String> {
    let fetched = tokio::time::timeout(limit, source.fetch_words())
        .await
        .unwrap_or(Err(WordSourceError::TimedOut(limit)));
    match fetched {
        Ok(words) => {
            let pool = normalize_pool(words);
            if pool.is_empty() {
                warn!("word source returned no usable words, using built-in list");
                default_words()
            } else {
                debug!(count = pool.len(), "word pool loaded");
                pool
            }
        }
        Err(e) => {
            warn!(error = %e, "word source failed, using built-in list");
            default_words()
        }
    }
}

fn normalize_pool(words: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .filter(|w| seen.insert(w.to_lowercase()))
        .collect()
}

/// Draws up to `count` distinct words from `pool`, without replacement.
///
/// Returns fewer than `count` only when the pool is smaller.
pub fn pick_options<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<String> {
    pool.choose_multiple(rng, count).cloned().collect()
}
