//! Write-only persistence seam.
//!
//! Rooms emit two kinds of records: an activity heartbeat on every join
//! and leave, and a game result when a game ends. Records are handed to a
//! [`GameStore`] by the room actor in a detached task; a failed write is
//! logged and never affects the game.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sketchline_protocol::RoomId;

/// Errors from a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("store request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend answered but refused the write.
    #[error("store rejected write with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Room heartbeat: which room is alive and how full it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomActivity {
    pub id: RoomId,
    pub player_count: usize,
    pub last_active: DateTime<Utc>,
}

/// One player's line in a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    /// The durable user id, not the session id.
    pub id: String,
    pub username: String,
    pub score: u32,
}

/// The outcome of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub room_id: RoomId,
    pub players: Vec<PlayerResult>,
    /// User id of the top scorer.
    pub winner: Option<String>,
    pub played_at: DateTime<Utc>,
}

/// A record produced by a room transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRecord {
    Activity(RoomActivity),
    Game(GameRecord),
}

/// Where room records go.
pub trait GameStore: Send + Sync + 'static {
    /// Upserts the heartbeat for a room.
    fn record_activity(
        &self,
        activity: RoomActivity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Appends a finished game.
    fn record_game(&self, record: GameRecord) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Discards everything. Used when no store is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl GameStore for NoopStore {
    async fn record_activity(&self, _activity: RoomActivity) -> Result<(), StoreError> {
        Ok(())
    }

    async fn record_game(&self, _record: GameRecord) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Keeps records in memory. Clones share the same buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    activities: Arc<Mutex<Vec<RoomActivity>>>,
    games: Arc<Mutex<Vec<GameRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heartbeats received so far, oldest first.
    pub fn activities(&self) -> Vec<RoomActivity> {
        self.activities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Finished games received so far, oldest first.
    pub fn games(&self) -> Vec<GameRecord> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl GameStore for MemoryStore {
    async fn record_activity(&self, activity: RoomActivity) -> Result<(), StoreError> {
        self.activities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(activity);
        Ok(())
    }

    async fn record_game(&self, record: GameRecord) -> Result<(), StoreError> {
        self.games
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        Ok(())
    }
}
