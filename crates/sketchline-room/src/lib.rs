//! Rooms for Sketchline.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns one
//! [`Room`] state machine and its single pending timer.
//!
//! # Key types
//!
//! - [`Room`]: the game session state machine (membership, turns,
//!   guesses, scores, timed transitions)
//! - [`RoomRegistry`]: creates rooms on first join, destroys them when
//!   they empty
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomConfig`]: rules and timings
//! - [`GameStore`]: where activity heartbeats and game results go

mod actor;
pub mod arbiter;
mod config;
mod error;
mod game;
mod outbox;
mod registry;
mod store;
pub mod turns;

pub use actor::{PlayerSender, RoomHandle};
pub use config::RoomConfig;
pub use error::RoomError;
pub use game::{Phase, Room, RoomInfo};
pub use outbox::Outbox;
pub use registry::{JoinRequest, RoomRegistry};
pub use store::{
    GameRecord, GameStore, MemoryStore, NoopStore, PlayerResult, RoomActivity, StoreError,
    StoreRecord,
};
