//! Room actor: an isolated Tokio task that owns one [`Room`].
//!
//! Commands arrive on an mpsc channel and timer firings come from the
//! room's [`PhaseTimer`](sketchline_timer::PhaseTimer); both are handled
//! in one `select!` loop, so a room processes exactly one event at a time
//! and never blocks on another room. Store records go to a companion
//! writer task that applies them in order without stalling the room.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use sketchline_protocol::{PlayerId, Recipient, RoomId, ServerEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::{GameStore, Outbox, Room, RoomError, RoomInfo, StoreRecord};

/// Channel sender for delivering notifications to a player's connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        user_id: String,
        username: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Replies with the number of players left.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },
    SelectWord {
        player_id: PlayerId,
        word: String,
    },
    SubmitText {
        player_id: PlayerId,
        text: String,
    },
    Draw {
        player_id: PlayerId,
        draw_data: serde_json::Value,
    },
    ClearCanvas {
        player_id: PlayerId,
    },
    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// Handle to a running room actor.
///
/// Cheap to clone; the registry holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Whether both handles talk to the same actor.
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Whether the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    /// Adds a player; notifications for them go to `sender`.
    pub async fn join(
        &self,
        player_id: PlayerId,
        user_id: impl Into<String>,
        username: impl Into<String>,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            player_id,
            user_id: user_id.into(),
            username: username.into(),
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Removes a player and returns how many remain. The actor stops when
    /// none do.
    pub async fn leave(&self, player_id: PlayerId) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Leave {
            player_id,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    pub async fn select_word(
        &self,
        player_id: PlayerId,
        word: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::SelectWord {
            player_id,
            word: word.into(),
        })
        .await
    }

    pub async fn submit_text(
        &self,
        player_id: PlayerId,
        text: impl Into<String>,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::SubmitText {
            player_id,
            text: text.into(),
        })
        .await
    }

    pub async fn draw(
        &self,
        player_id: PlayerId,
        draw_data: serde_json::Value,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Draw {
            player_id,
            draw_data,
        })
        .await
    }

    pub async fn clear_canvas(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::ClearCanvas { player_id }).await
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }
}

/// Current time as a std instant, read from Tokio's clock so a paused
/// test runtime controls it.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

struct RoomActor {
    room: Room,
    /// Per-player notification channels; keys mirror room membership.
    senders: HashMap<PlayerId, PlayerSender>,
    /// Feeds this room's store writer, which applies records in order.
    records: mpsc::UnboundedSender<StoreRecord>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        debug!(room_id = %self.room.id(), "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                fired = sketchline_timer::fire(self.room.armed_timer()) => {
                    let mut out = Outbox::new();
                    self.room.on_timer(fired, now(), &mut out);
                    self.flush(out);
                }
            }
        }

        debug!(room_id = %self.room.id(), "room actor stopped");
    }

    /// Handles one command. Returns `false` when the actor should stop.
    fn handle(&mut self, cmd: RoomCommand) -> bool {
        let mut out = Outbox::new();
        let mut keep_running = true;

        match cmd {
            RoomCommand::Join {
                player_id,
                user_id,
                username,
                sender,
                reply,
            } => {
                let result = self
                    .room
                    .add_player(player_id, &user_id, &username, now(), &mut out);
                if result.is_ok() {
                    self.senders.insert(player_id, sender);
                }
                self.flush(out);
                let _ = reply.send(result);
                return keep_running;
            }
            RoomCommand::Leave { player_id, reply } => {
                let result = self.room.remove_player(player_id, now(), &mut out);
                if result.is_ok() {
                    self.senders.remove(&player_id);
                }
                if matches!(result, Ok(0)) {
                    info!(room_id = %self.room.id(), "room emptied");
                    keep_running = false;
                }
                self.flush(out);
                let _ = reply.send(result);
                return keep_running;
            }
            RoomCommand::SelectWord { player_id, word } => {
                self.room.choose_word(player_id, &word, now(), &mut out);
            }
            RoomCommand::SubmitText { player_id, text } => {
                self.room.submit_text(player_id, &text, now(), &mut out);
            }
            RoomCommand::Draw {
                player_id,
                draw_data,
            } => {
                self.room.draw(player_id, draw_data, &mut out);
            }
            RoomCommand::ClearCanvas { player_id } => {
                self.room.clear_canvas(player_id, &mut out);
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.room.info());
            }
            RoomCommand::Shutdown => {
                info!(room_id = %self.room.id(), "room shutting down");
                keep_running = false;
            }
        }

        self.flush(out);
        keep_running
    }

    /// Delivers queued notifications and hands records to the store.
    fn flush(&self, out: Outbox) {
        let (events, records) = out.into_parts();
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(player_id) => {
                    self.send_to(player_id, event);
                }
                Recipient::AllExcept(excluded) => {
                    for (player_id, sender) in &self.senders {
                        if *player_id != excluded {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
        for record in records {
            self.persist(record);
        }
    }

    /// Silently drops if the player's connection is gone.
    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }

    fn persist(&self, record: StoreRecord) {
        if self.records.send(record).is_err() {
            warn!(room_id = %self.room.id(), "store writer gone, record dropped");
        }
    }
}

/// Writes one room's records one at a time, in the order the room
/// produced them. Ends once the actor is gone and the queue is drained.
async fn write_records<S: GameStore>(
    room_id: RoomId,
    store: Arc<S>,
    mut records: mpsc::UnboundedReceiver<StoreRecord>,
) {
    while let Some(record) = records.recv().await {
        let result = match record {
            StoreRecord::Activity(activity) => store.record_activity(activity).await,
            StoreRecord::Game(game) => store.record_game(game).await,
        };
        if let Err(e) = result {
            warn!(%room_id, error = %e, "store write failed");
        }
    }
}

/// Spawns a room actor around `room` and returns its handle.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub(crate) fn spawn_room<S: GameStore>(room: Room, store: Arc<S>, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let (records_tx, records_rx) = mpsc::unbounded_channel();
    let room_id = room.id().clone();

    tokio::spawn(write_records(room_id.clone(), store, records_rx));
    let actor = RoomActor {
        room,
        senders: HashMap::new(),
        records: records_tx,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { room_id, sender: tx }
}
