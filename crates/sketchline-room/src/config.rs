//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rules and timings for every room the registry creates.
///
/// Override single fields with struct-update syntax:
///
/// ```rust
/// use std::time::Duration;
/// use sketchline_room::RoomConfig;
///
/// let config = RoomConfig {
///     total_rounds: 5,
///     round_duration: Duration::from_secs(60),
///     ..Default::default()
/// };
/// assert_eq!(config.min_players, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Rounds per game.
    pub total_rounds: u32,

    /// Players needed (while waiting) to start a game.
    pub min_players: usize,

    /// Words offered to the drawer each round.
    pub word_choices: usize,

    /// Countdown between "game starting" and the first round.
    pub start_delay: Duration,

    /// How long the drawer has to choose before a word is picked for them.
    pub selection_timeout: Duration,

    /// Drawing time per round.
    pub round_duration: Duration,

    /// Pause between a round's reveal and the next round.
    pub intermission: Duration,

    /// How long the final leaderboard stays up before the room resets.
    pub reset_delay: Duration,

    /// Flat points for a correct guess, on top of the time bonus.
    pub guess_base_points: u32,

    /// Points the drawer earns per player who found the word.
    pub drawer_points_per_guess: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            total_rounds: 3,
            min_players: 2,
            word_choices: 3,
            start_delay: Duration::from_secs(3),
            selection_timeout: Duration::from_secs(15),
            round_duration: Duration::from_secs(80),
            intermission: Duration::from_secs(10),
            reset_delay: Duration::from_secs(10),
            guess_base_points: 50,
            drawer_points_per_guess: 25,
        }
    }
}

impl RoomConfig {
    /// Fixes out-of-range values so the config is safe to run.
    ///
    /// Called by [`Room::new`](crate::Room::new). Rounds, minimum players
    /// and word choices are raised to at least 1.
    pub fn validated(mut self) -> Self {
        if self.total_rounds == 0 {
            warn!("total_rounds is 0, using 1");
            self.total_rounds = 1;
        }
        if self.min_players == 0 {
            warn!("min_players is 0, using 1");
            self.min_players = 1;
        }
        if self.word_choices == 0 {
            warn!("word_choices is 0, using 1");
            self.word_choices = 1;
        }
        self
    }
}
