//! Wire protocol for Sketchline.
//!
//! This crate defines the "language" spoken between the game server and
//! its clients:
//!
//! - **Model** ([`Player`], [`ChatMessage`], [`GameState`], ids): the
//!   records that appear inside notifications.
//! - **Events** ([`ClientEvent`], [`ServerEvent`]): the discrete named
//!   events that travel on the wire, one JSON frame each.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how events are turned
//!   into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Connection (bytes) → Protocol (ClientEvent) → Room registry → Room actor
//! Room actor → (Recipient, ServerEvent) → Protocol (bytes) → Connection
//! ```
//!
//! The protocol layer knows nothing about rooms or timers; it only
//! describes what is said.

mod codec;
mod error;
mod events;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use events::{ClientEvent, ServerEvent};
pub use types::{
    ChatMessage, GameState, Player, PlayerId, Recipient, RoomId, Scores,
    SYSTEM_SENDER,
};
