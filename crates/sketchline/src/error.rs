//! Unified error type for the server.

use sketchline_protocol::ProtocolError;
use sketchline_room::RoomError;
use tokio_tungstenite::tungstenite;

/// Top-level error wrapping the workspace's per-crate errors.
///
/// Only setup and connection plumbing return this. Game-level problems
/// (unknown rooms, moves out of turn) are absorbed by the rooms and never
/// reach here.
#[derive(Debug, thiserror::Error)]
pub enum SketchlineError {
    /// Binding or accepting on the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The WebSocket handshake or stream failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Room(#[from] RoomError),

    /// An environment variable held an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),
}
