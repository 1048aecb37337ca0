//! Inbound and outbound events.
//!
//! Every frame on the wire is one event, adjacently tagged:
//!
//! ```text
//! { "event": "send-message", "data": { "roomId": "abcd", "message": "pizza" } }
//! ```
//!
//! Event names are kebab-case and payload fields camelCase, so a browser
//! client can dispatch on `event` and hand `data` straight to its UI.

use serde::{Deserialize, Serialize};

use crate::{ChatMessage, GameState, Player, PlayerId, ProtocolError, RoomId, Scores};

/// Events a client sends to the server. Each one names the room it
/// targets; an unknown room is silently ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join (and lazily create) a room.
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_id: RoomId,
        username: String,
        user_id: String,
    },

    /// Leave a room without closing the connection.
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: RoomId },

    /// The drawer picks one of the offered words.
    #[serde(rename_all = "camelCase")]
    SelectWord { room_id: RoomId, word: String },

    /// Chat text; evaluated as a guess while drawing.
    #[serde(rename_all = "camelCase")]
    SendMessage { room_id: RoomId, message: String },

    /// Stroke data from the drawer. Opaque to the server.
    #[serde(rename_all = "camelCase")]
    Draw {
        room_id: RoomId,
        draw_data: serde_json::Value,
    },

    /// The drawer wipes the canvas.
    #[serde(rename_all = "camelCase")]
    ClearCanvas { room_id: RoomId },
}

impl ClientEvent {
    /// The room this event is addressed to.
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::JoinRoom { room_id, .. }
            | Self::LeaveRoom { room_id }
            | Self::SelectWord { room_id, .. }
            | Self::SendMessage { room_id, .. }
            | Self::Draw { room_id, .. }
            | Self::ClearCanvas { room_id } => room_id,
        }
    }

    /// Checks the rules serde cannot express: a non-blank room id, and a
    /// non-blank username on join.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidMessage`] naming the offending field.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.room_id().as_str().trim().is_empty() {
            return Err(ProtocolError::InvalidMessage("roomId must not be empty".into()));
        }
        if let Self::JoinRoom { username, .. } = self {
            if username.trim().is_empty() {
                return Err(ProtocolError::InvalidMessage("username must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// Notifications the server sends to room members.
///
/// Each notification carries enough state (players, scores, round
/// numbers, timings) for a stateless renderer to rebuild its view from
/// the latest message alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Membership snapshot after a join.
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        players: Vec<Player>,
        game_state: GameState,
    },

    /// Membership snapshot after a leave.
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        players: Vec<Player>,
        player_id: PlayerId,
    },

    /// The game countdown began; the first round follows in `countdown`
    /// seconds.
    GameStarting { message: String, countdown: u64 },

    /// A new round: who draws, and which round of how many.
    #[serde(rename_all = "camelCase")]
    RoundStarted {
        round: u32,
        total_rounds: u32,
        drawer: String,
        drawer_id: PlayerId,
    },

    /// Sent to the drawer only: the words to choose from.
    #[serde(rename_all = "camelCase")]
    ChooseWord {
        options: Vec<String>,
        timeout_secs: u64,
    },

    /// Sent to the drawer only: the secret word.
    CurrentWord { word: String },

    /// Sent to everyone but the drawer: one `_` per character.
    WordHint { hint: String },

    /// Drawing began; the round lasts `duration_secs`.
    #[serde(rename_all = "camelCase")]
    DrawingStarted { round: u32, duration_secs: u64 },

    /// Drawer stroke data relayed to the other players.
    #[serde(rename_all = "camelCase")]
    DrawData { draw_data: serde_json::Value },

    /// The drawer cleared the canvas.
    CanvasCleared,

    /// A chat log entry (player chat or system announcement).
    ChatMessage(ChatMessage),

    /// Current scores after any change.
    UpdateScores { scores: Scores },

    /// The round is over; the word is revealed.
    RoundEnded { word: String, scores: Scores },

    /// The drawer disconnected; the round was abandoned.
    DrawerLeft,

    /// All rounds played.
    GameEnded {
        winner: Option<Player>,
        leaderboard: Vec<Player>,
    },

    /// The room went back to waiting after a finished game.
    #[serde(rename_all = "camelCase")]
    RoomReset {
        players: Vec<Player>,
        game_state: GameState,
    },

    /// A frame from this connection could not be understood.
    Error { message: String },
}

impl ServerEvent {
    /// The kebab-case wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlayerJoined { .. } => "player-joined",
            Self::PlayerLeft { .. } => "player-left",
            Self::GameStarting { .. } => "game-starting",
            Self::RoundStarted { .. } => "round-started",
            Self::ChooseWord { .. } => "choose-word",
            Self::CurrentWord { .. } => "current-word",
            Self::WordHint { .. } => "word-hint",
            Self::DrawingStarted { .. } => "drawing-started",
            Self::DrawData { .. } => "draw-data",
            Self::CanvasCleared => "canvas-cleared",
            Self::ChatMessage(_) => "chat-message",
            Self::UpdateScores { .. } => "update-scores",
            Self::RoundEnded { .. } => "round-ended",
            Self::DrawerLeft => "drawer-left",
            Self::GameEnded { .. } => "game-ended",
            Self::RoomReset { .. } => "room-reset",
            Self::Error { .. } => "error",
        }
    }
}
