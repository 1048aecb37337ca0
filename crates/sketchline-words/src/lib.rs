//! Word sources for Sketchline rooms.
//!
//! Every room captures a word pool once, at creation. The pool comes from
//! a [`WordSource`]: the built-in [`DEFAULT_WORDS`] table, a caller
//! supplied [`StaticWords`] table, or the hosted catalog behind
//! [`CatalogClient`]. [`load_word_pool`] hides source failures behind the
//! built-in list, and [`pick_options`] draws the drawer's choices.

mod builtin;
mod catalog;
mod error;
mod pool;
mod source;

pub use builtin::{DEFAULT_WORDS, default_words};
pub use catalog::{CATALOG_LIMIT, CATALOG_TIMEOUT, CatalogClient};
pub use error::WordSourceError;
pub use pool::{WORD_FETCH_TIMEOUT, load_word_pool, load_word_pool_within, pick_options};
pub use source::{StaticWords, WordCatalog, WordSource};
