//! Room registry: creates rooms on first join, routes players to them,
//! and destroys them the moment they empty.

use std::collections::HashMap;
use std::sync::Arc;

use sketchline_protocol::{PlayerId, RoomId};
use sketchline_words::{WordSource, load_word_pool};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::actor::spawn_room;
use crate::{GameStore, PlayerSender, Room, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Everything a join needs besides the room id.
#[derive(Debug, Clone)]
pub struct JoinRequest {
    pub player_id: PlayerId,
    pub user_id: String,
    pub username: String,
    pub sender: PlayerSender,
}

/// Process-wide map from room id to running room actor.
///
/// The map lock is held only for lookups, inserts and removals, never
/// while a room answers, so a busy room cannot stall another room's
/// traffic. A room stops itself on the leave that empties it; whoever
/// sees that (the leaver, or a joiner whose command arrived too late)
/// removes the entry, and only if it still points at that same actor.
/// The word pool for a new room is fetched without the lock held.
pub struct RoomRegistry<W: WordSource, S: GameStore> {
    rooms: Mutex<HashMap<RoomId, RoomHandle>>,
    words: Arc<W>,
    store: Arc<S>,
    config: RoomConfig,
}

impl<W: WordSource, S: GameStore> RoomRegistry<W, S> {
    pub fn new(config: RoomConfig, words: W, store: S) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            words: Arc::new(words),
            store: Arc::new(store),
            config,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the running room, creating a waiting one with a fresh word
    /// pool if none exists. Only [`join`](Self::join) calls this, so a
    /// room never exists without having had a player.
    async fn get_or_create(&self, room_id: &RoomId) -> RoomHandle {
        if let Some(handle) = self.get(room_id).await {
            return handle;
        }

        let pool = load_word_pool(&*self.words).await;

        let mut rooms = self.rooms.lock().await;
        if let Some(existing) = rooms.get(room_id).filter(|h| !h.is_closed()) {
            return existing.clone();
        }
        let room = Room::new(room_id.clone(), self.config.clone(), pool);
        let handle = spawn_room(room, Arc::clone(&self.store), DEFAULT_CHANNEL_SIZE);
        rooms.insert(room_id.clone(), handle.clone());
        info!(%room_id, rooms = rooms.len(), "room created");
        handle
    }

    /// Drops the entry for `room_id` if it still belongs to `handle`.
    async fn forget(&self, room_id: &RoomId, handle: &RoomHandle) {
        let mut rooms = self.rooms.lock().await;
        if rooms.get(room_id).is_some_and(|current| current.same_room(handle)) {
            rooms.remove(room_id);
            info!(%room_id, rooms = rooms.len(), "room destroyed");
        }
    }

    /// Adds a player to a room, creating the room if needed.
    pub async fn join(&self, room_id: &RoomId, request: JoinRequest) -> Result<(), RoomError> {
        loop {
            let handle = self.get_or_create(room_id).await;
            match handle
                .join(
                    request.player_id,
                    request.user_id.clone(),
                    request.username.clone(),
                    request.sender.clone(),
                )
                .await
            {
                Err(RoomError::Unavailable(_)) => {
                    // The room emptied and stopped before our join reached it.
                    debug!(%room_id, "joined a stopping room, retrying");
                    self.forget(room_id, &handle).await;
                }
                other => return other,
            }
        }
    }

    /// Removes a player from a room and returns how many remain. The room
    /// is destroyed when none do.
    pub async fn leave(&self, room_id: &RoomId, player_id: PlayerId) -> Result<usize, RoomError> {
        let handle = self
            .get(room_id)
            .await
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let result = handle.leave(player_id).await;
        if matches!(result, Ok(0) | Err(RoomError::Unavailable(_))) {
            self.forget(room_id, &handle).await;
        }
        result
    }

    /// The running room, if any. A room that has stopped but is not yet
    /// forgotten counts as absent.
    pub async fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms
            .lock()
            .await
            .get(room_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    pub async fn contains(&self, room_id: &RoomId) -> bool {
        self.get(room_id).await.is_some()
    }

    pub async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        let handle = self
            .get(room_id)
            .await
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        handle.info().await
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.lock().await.keys().cloned().collect()
    }

    /// Stops every room actor and clears the map.
    pub async fn shutdown(&self) {
        let mut rooms = self.rooms.lock().await;
        for (room_id, handle) in rooms.drain() {
            let _ = handle.shutdown().await;
            debug!(%room_id, "room stopped");
        }
    }
}
