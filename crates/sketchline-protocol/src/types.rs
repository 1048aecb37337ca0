//! Core model types shared by the server and its clients.
//!
//! Everything here is serialized inside [`ServerEvent`](crate::ServerEvent)
//! notifications, so field names follow the client's camelCase convention.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Session-scoped identifier of a connected participant.
///
/// Assigned by the server when a connection is accepted and tied to that
/// connection's lifetime. A reconnecting user receives a new `PlayerId`;
/// the durable identity is [`Player::user_id`].
///
/// `#[serde(transparent)]` keeps it a plain number on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Opaque, externally supplied room identifier (e.g. `"abcd"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cumulative score per player. Ordered so snapshots are stable.
pub type Scores = BTreeMap<PlayerId, u32>;

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive a server event.
///
/// The room state machine pairs every outbound [`ServerEvent`](crate::ServerEvent)
/// with a `Recipient`; the room actor resolves it against the current
/// membership when dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player (e.g. the drawer's word options).
    Player(PlayerId),
    /// Everyone except one player (e.g. stroke data, word hints).
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Phase of a room's game session.
///
/// ```text
/// Waiting → Starting → SelectingWord → Drawing → RoundEnded ─┬→ SelectingWord
///    ↑                                                        └→ Ended ─┐
///    └──────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Fewer than the minimum number of players, or waiting for the
    /// restart after a finished game.
    #[default]
    Waiting,
    /// Countdown before the first round.
    Starting,
    /// The drawer is choosing among the offered words.
    SelectingWord,
    /// The drawer draws; everyone else guesses.
    Drawing,
    /// The word has been revealed; intermission before the next round.
    RoundEnded,
    /// All rounds played; leaderboard shown until the room resets.
    Ended,
}

impl GameState {
    /// Returns `true` while a round is in play (drawer assigned).
    pub fn is_round_active(&self) -> bool {
        matches!(self, Self::SelectingWord | Self::Drawing)
    }

    /// The wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Starting => "starting",
            Self::SelectingWord => "selecting_word",
            Self::Drawing => "drawing",
            Self::RoundEnded => "round_ended",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A participant in a room, as seen by every client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Session-scoped id (the connection).
    pub id: PlayerId,
    /// Durable identity, stable across reconnects.
    pub user_id: String,
    /// Display name; not guaranteed unique.
    pub username: String,
    /// Cumulative points in the current game.
    pub score: u32,
    /// Whether the player already found this round's word.
    pub has_guessed_correctly: bool,
}

impl Player {
    /// A freshly joined player: zero score, no guess yet.
    pub fn new(id: PlayerId, user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            username: username.into(),
            score: 0,
            has_guessed_correctly: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// Sender name used for server-authored chat entries.
pub const SYSTEM_SENDER: &str = "System";

/// One entry of a room's chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Username of the author, or [`SYSTEM_SENDER`].
    pub sender: String,
    pub message: String,
    pub is_system: bool,
    pub is_correct_guess: bool,
}

impl ChatMessage {
    /// An ordinary message written by a player.
    pub fn from_player(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            is_system: false,
            is_correct_guess: false,
        }
    }

    /// The system announcement that `username` found the word.
    pub fn correct_guess(username: &str) -> Self {
        Self {
            sender: SYSTEM_SENDER.to_string(),
            message: format!("{username} guessed the word!"),
            is_system: true,
            is_correct_guess: true,
        }
    }
}
