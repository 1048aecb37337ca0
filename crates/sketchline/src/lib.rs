//! # Sketchline
//!
//! A multiplayer draw-and-guess game server.
//!
//! Players connect over WebSocket, join a room by id, and take turns
//! drawing a secret word while the others guess it in chat. Rooms are
//! created on first join and destroyed when their last player leaves;
//! each one runs as its own Tokio task (see [`sketchline_room`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sketchline::prelude::*;
//!
//! # async fn run() -> Result<(), SketchlineError> {
//! let server = ServerBuilder::new()
//!     .bind("0.0.0.0:3001")
//!     .build(StaticWords::default(), NoopStore)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;
mod store;

pub use config::{DEFAULT_BIND_ADDR, ServerConfig, SupabaseConfig};
pub use error::SketchlineError;
pub use server::{ServerBuilder, SketchlineServer};
pub use store::{RestStore, STORE_TIMEOUT, StoreBackend};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{
        RestStore, ServerBuilder, ServerConfig, SketchlineError, SketchlineServer, StoreBackend,
        SupabaseConfig,
    };
    pub use sketchline_protocol::{
        ChatMessage, ClientEvent, GameState, Player, PlayerId, RoomId, ServerEvent,
    };
    pub use sketchline_room::{GameStore, MemoryStore, NoopStore, RoomConfig};
    pub use sketchline_words::{CatalogClient, StaticWords, WordCatalog, WordSource};
}
