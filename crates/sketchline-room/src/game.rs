//! The room state machine.
//!
//! [`Room`] holds everything about one game session and applies one
//! event at a time: a join, a leave, a chat line, a word choice, stroke
//! data, or a timer firing. It never sleeps and never sends; every
//! handler takes the current instant and appends its notifications and
//! store records to an [`Outbox`].
//!
//! ```text
//!            join (≥ min players)
//! Waiting ──────────────────────────▶ Starting
//!    ▲                                    │ start_delay
//!    │ reset_delay                        ▼
//!  Ended ◀── last round ── RoundEnded ◀── Drawing ◀── SelectingWord
//!                              │   round timer or      ▲   choice or
//!                              │   everyone guessed    │   selection timeout
//!                              └────── intermission ───┘
//! ```

use std::time::{Duration, Instant};

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sketchline_protocol::{
    ChatMessage, GameState, Player, PlayerId, Recipient, RoomId, Scores, ServerEvent,
};
use sketchline_timer::{Armed, PhaseTimer};
use sketchline_words::pick_options;
use tracing::{debug, info};

use crate::arbiter::{self, GuessContext, Verdict};
use crate::turns;
use crate::{GameRecord, Outbox, PlayerResult, RoomActivity, RoomConfig, RoomError, StoreRecord};

const STARTING_MESSAGE: &str = "Game is starting...";

/// The scheduled transition a room is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Starting → first round.
    Countdown,
    /// SelectingWord → Drawing with a random option.
    WordSelection,
    /// Drawing → RoundEnded.
    Round,
    /// RoundEnded → next round or Ended.
    Intermission,
    /// Ended → Waiting.
    Reset,
}

impl Phase {
    /// The game state this phase's firing applies to.
    fn expected_state(self) -> GameState {
        match self {
            Self::Countdown => GameState::Starting,
            Self::WordSelection => GameState::SelectingWord,
            Self::Round => GameState::Drawing,
            Self::Intermission => GameState::RoundEnded,
            Self::Reset => GameState::Ended,
        }
    }
}

/// A snapshot of room metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub state: GameState,
    pub round: u32,
    pub total_rounds: u32,
    pub drawer: Option<PlayerId>,
    pub player_count: usize,
}

/// One game session.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    config: RoomConfig,
    /// Join order; drives drawer rotation.
    players: Vec<Player>,
    /// Mirrors `Player::score` for every member.
    scores: Scores,
    state: GameState,
    current_round: u32,
    current_drawer: Option<PlayerId>,
    current_word: String,
    word_options: Vec<String>,
    chat: Vec<ChatMessage>,
    word_pool: Vec<String>,
    /// Set only while drawing.
    round_start: Option<Instant>,
    timer: PhaseTimer<Phase>,
    rng: StdRng,
}

impl Room {
    /// A waiting room with no players and the given word pool.
    pub fn new(id: RoomId, config: RoomConfig, word_pool: Vec<String>) -> Self {
        Self::with_rng(id, config, word_pool, StdRng::from_os_rng())
    }

    /// Like [`Room::new`] with a caller-supplied random source.
    pub fn with_rng(id: RoomId, config: RoomConfig, word_pool: Vec<String>, rng: StdRng) -> Self {
        Self {
            id,
            config: config.validated(),
            players: Vec::new(),
            scores: Scores::new(),
            state: GameState::Waiting,
            current_round: 0,
            current_drawer: None,
            current_word: String::new(),
            word_options: Vec::new(),
            chat: Vec::new(),
            word_pool,
            round_start: None,
            timer: PhaseTimer::new(),
            rng,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.player(player_id).is_some()
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.config.total_rounds
    }

    pub fn current_drawer(&self) -> Option<PlayerId> {
        self.current_drawer
    }

    /// The secret word; empty when none is selected.
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn word_options(&self) -> &[String] {
        &self.word_options
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn word_pool(&self) -> &[String] {
        &self.word_pool
    }

    pub fn round_start(&self) -> Option<Instant> {
        self.round_start
    }

    /// The pending transition, if any.
    pub fn armed_timer(&self) -> Option<Armed<Phase>> {
        self.timer.armed()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.id.clone(),
            state: self.state,
            round: self.current_round,
            total_rounds: self.config.total_rounds,
            drawer: self.current_drawer,
            player_count: self.players.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Appends a player with a zero score.
    ///
    /// Starts the game when a waiting room reaches the minimum player
    /// count.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        user_id: &str,
        username: &str,
        now: Instant,
        out: &mut Outbox,
    ) -> Result<(), RoomError> {
        if self.contains(player_id) {
            return Err(RoomError::AlreadyInRoom(player_id, self.id.clone()));
        }

        self.players.push(Player::new(player_id, user_id, username));
        self.scores.insert(player_id, 0);
        info!(
            room_id = %self.id,
            %player_id,
            username,
            players = self.players.len(),
            "player joined"
        );

        out.broadcast(ServerEvent::PlayerJoined {
            players: self.players.clone(),
            game_state: self.state,
        });
        out.record(self.activity());

        if self.state == GameState::Waiting && self.players.len() >= self.config.min_players {
            self.start_game(now, out);
        }
        Ok(())
    }

    /// Removes a player and returns how many remain.
    ///
    /// At zero the pending timer is cancelled and the caller destroys the
    /// room. When the drawer leaves mid-round the round is abandoned and
    /// the game advances immediately.
    pub fn remove_player(
        &mut self,
        player_id: PlayerId,
        now: Instant,
        out: &mut Outbox,
    ) -> Result<usize, RoomError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| RoomError::NotInRoom(player_id, self.id.clone()))?;

        self.players.remove(index);
        self.scores.remove(&player_id);
        info!(
            room_id = %self.id,
            %player_id,
            players = self.players.len(),
            "player left"
        );

        out.broadcast(ServerEvent::PlayerLeft {
            players: self.players.clone(),
            player_id,
        });
        out.record(self.activity());

        if self.players.is_empty() {
            self.timer.cancel();
            return Ok(0);
        }

        let was_drawer = self.current_drawer == Some(player_id);
        if was_drawer && self.state.is_round_active() {
            info!(room_id = %self.id, round = self.current_round, "drawer left mid-round");
            self.timer.cancel();
            self.current_drawer = None;
            out.broadcast(ServerEvent::DrawerLeft);
            self.advance_round(now, out);
        } else if self.state == GameState::Drawing && self.everyone_guessed() {
            self.end_round(now, out);
        }

        Ok(self.players.len())
    }

    // -----------------------------------------------------------------------
    // Player actions
    // -----------------------------------------------------------------------

    /// Evaluates chat text as a guess or plain chat.
    pub fn submit_text(&mut self, player_id: PlayerId, text: &str, now: Instant, out: &mut Outbox) {
        let Some(index) = self.players.iter().position(|p| p.id == player_id) else {
            debug!(room_id = %self.id, %player_id, "chat from non-member ignored");
            return;
        };

        let ctx = GuessContext {
            state: self.state,
            word: &self.current_word,
            is_drawer: self.current_drawer == Some(player_id),
            already_guessed: self.players[index].has_guessed_correctly,
        };

        match arbiter::evaluate(ctx, text) {
            Verdict::Ignored => {}
            Verdict::Chat => {
                let entry = ChatMessage::from_player(self.players[index].username.clone(), text);
                self.chat.push(entry.clone());
                out.broadcast(ServerEvent::ChatMessage(entry));
            }
            Verdict::CorrectGuess => self.award_guess(index, now, out),
        }
    }

    /// The drawer picks one of the offered words.
    ///
    /// Ignored unless the room is selecting, the sender is the drawer, and
    /// `word` is one of the options.
    pub fn choose_word(&mut self, player_id: PlayerId, word: &str, now: Instant, out: &mut Outbox) {
        if self.state != GameState::SelectingWord || self.current_drawer != Some(player_id) {
            debug!(
                room_id = %self.id,
                %player_id,
                state = %self.state,
                "word choice out of turn ignored"
            );
            return;
        }
        let Some(choice) = turns::find_option(&self.word_options, word).cloned() else {
            debug!(room_id = %self.id, %player_id, "word choice not among options ignored");
            return;
        };
        self.begin_drawing(choice, now, out);
    }

    /// Relays stroke data from the drawer to everyone else.
    pub fn draw(&mut self, player_id: PlayerId, draw_data: serde_json::Value, out: &mut Outbox) {
        if self.state != GameState::Drawing || self.current_drawer != Some(player_id) {
            return;
        }
        out.send(
            Recipient::AllExcept(player_id),
            ServerEvent::DrawData { draw_data },
        );
    }

    /// The drawer wipes the canvas for everyone.
    pub fn clear_canvas(&mut self, player_id: PlayerId, out: &mut Outbox) {
        if !self.state.is_round_active() || self.current_drawer != Some(player_id) {
            return;
        }
        out.broadcast(ServerEvent::CanvasCleared);
    }

    // -----------------------------------------------------------------------
    // Timer
    // -----------------------------------------------------------------------

    /// Applies a timer firing. Stale firings (re-armed or cancelled slot,
    /// or a state that moved on) are discarded.
    pub fn on_timer(&mut self, fired: Armed<Phase>, now: Instant, out: &mut Outbox) {
        if !self.timer.claim(&fired) {
            debug!(room_id = %self.id, phase = ?fired.kind(), "stale timer discarded");
            return;
        }
        let phase = fired.kind();
        if self.state != phase.expected_state() {
            debug!(
                room_id = %self.id,
                ?phase,
                state = %self.state,
                "timer fired in unexpected state"
            );
            return;
        }

        match phase {
            Phase::Countdown => self.start_round(now, out),
            Phase::WordSelection => self.auto_select(now, out),
            Phase::Round => self.end_round(now, out),
            Phase::Intermission => self.advance_round(now, out),
            Phase::Reset => self.reset(now, out),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    fn start_game(&mut self, now: Instant, out: &mut Outbox) {
        self.state = GameState::Starting;
        self.current_round = 1;
        for player in &mut self.players {
            player.score = 0;
        }
        for score in self.scores.values_mut() {
            *score = 0;
        }
        info!(room_id = %self.id, players = self.players.len(), "game starting");

        out.broadcast(ServerEvent::GameStarting {
            message: STARTING_MESSAGE.to_string(),
            countdown: self.config.start_delay.as_secs(),
        });
        self.timer.arm(Phase::Countdown, now, self.config.start_delay);
    }

    fn start_round(&mut self, now: Instant, out: &mut Outbox) {
        let Some(index) = turns::drawer_index(self.current_round, self.players.len()) else {
            return;
        };

        for player in &mut self.players {
            player.has_guessed_correctly = false;
        }
        self.current_word.clear();
        self.round_start = None;

        let drawer = &self.players[index];
        let drawer_id = drawer.id;
        let drawer_name = drawer.username.clone();
        self.current_drawer = Some(drawer_id);
        self.word_options = pick_options(&self.word_pool, self.config.word_choices, &mut self.rng);
        self.state = GameState::SelectingWord;
        debug!(
            room_id = %self.id,
            round = self.current_round,
            drawer = %drawer_id,
            "round started"
        );

        out.broadcast(ServerEvent::RoundStarted {
            round: self.current_round,
            total_rounds: self.config.total_rounds,
            drawer: drawer_name,
            drawer_id,
        });
        out.send_to(
            drawer_id,
            ServerEvent::ChooseWord {
                options: self.word_options.clone(),
                timeout_secs: self.config.selection_timeout.as_secs(),
            },
        );
        self.timer
            .arm(Phase::WordSelection, now, self.config.selection_timeout);
    }

    fn auto_select(&mut self, now: Instant, out: &mut Outbox) {
        match turns::auto_pick(&self.word_options, &mut self.rng).cloned() {
            Some(word) => {
                debug!(room_id = %self.id, round = self.current_round, "word picked on timeout");
                self.begin_drawing(word, now, out);
            }
            None => self.advance_round(now, out),
        }
    }

    fn begin_drawing(&mut self, word: String, now: Instant, out: &mut Outbox) {
        let Some(drawer_id) = self.current_drawer else {
            return;
        };
        let hint = turns::hint_for(&word);
        self.current_word = word;
        self.word_options.clear();
        self.round_start = Some(now);
        self.state = GameState::Drawing;
        debug!(room_id = %self.id, round = self.current_round, "drawing started");

        out.send_to(
            drawer_id,
            ServerEvent::CurrentWord {
                word: self.current_word.clone(),
            },
        );
        out.send(Recipient::AllExcept(drawer_id), ServerEvent::WordHint { hint });
        out.broadcast(ServerEvent::DrawingStarted {
            round: self.current_round,
            duration_secs: self.config.round_duration.as_secs(),
        });
        self.timer.arm(Phase::Round, now, self.config.round_duration);
    }

    fn award_guess(&mut self, index: usize, now: Instant, out: &mut Outbox) {
        let elapsed = self
            .round_start
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        let points = arbiter::guess_points(
            elapsed,
            self.config.round_duration,
            self.config.guess_base_points,
        );

        let player = &mut self.players[index];
        player.has_guessed_correctly = true;
        player.score = player.score.saturating_add(points);
        let (player_id, score) = (player.id, player.score);
        let entry = ChatMessage::correct_guess(&player.username);
        self.scores.insert(player_id, score);
        info!(room_id = %self.id, %player_id, points, "correct guess");

        self.chat.push(entry.clone());
        out.broadcast(ServerEvent::ChatMessage(entry));
        out.broadcast(ServerEvent::UpdateScores {
            scores: self.scores.clone(),
        });

        if self.everyone_guessed() {
            self.end_round(now, out);
        }
    }

    fn end_round(&mut self, now: Instant, out: &mut Outbox) {
        self.state = GameState::RoundEnded;
        self.round_start = None;

        out.broadcast(ServerEvent::RoundEnded {
            word: self.current_word.clone(),
            scores: self.scores.clone(),
        });

        let drawer_id = self.current_drawer;
        let guessers = self
            .players
            .iter()
            .filter(|p| Some(p.id) != drawer_id && p.has_guessed_correctly)
            .count();
        if let Some(drawer) = self.players.iter_mut().find(|p| Some(p.id) == drawer_id) {
            let bonus = arbiter::drawer_bonus(guessers, self.config.drawer_points_per_guess);
            drawer.score = drawer.score.saturating_add(bonus);
            self.scores.insert(drawer.id, drawer.score);
            out.broadcast(ServerEvent::UpdateScores {
                scores: self.scores.clone(),
            });
        }
        debug!(
            room_id = %self.id,
            round = self.current_round,
            guessers,
            "round ended"
        );
        self.timer.arm(Phase::Intermission, now, self.config.intermission);
    }

    fn advance_round(&mut self, now: Instant, out: &mut Outbox) {
        self.current_round += 1;
        if self.current_round > self.config.total_rounds {
            self.end_game(now, out);
        } else {
            self.start_round(now, out);
        }
    }

    fn end_game(&mut self, now: Instant, out: &mut Outbox) {
        self.state = GameState::Ended;
        self.round_start = None;

        let mut leaderboard = self.players.clone();
        leaderboard.sort_by(|a, b| b.score.cmp(&a.score));
        let winner = leaderboard.first().cloned();
        info!(
            room_id = %self.id,
            winner = winner.as_ref().map(|w| w.username.as_str()),
            "game ended"
        );

        out.record(StoreRecord::Game(GameRecord {
            room_id: self.id.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerResult {
                    id: p.user_id.clone(),
                    username: p.username.clone(),
                    score: p.score,
                })
                .collect(),
            winner: winner.as_ref().map(|w| w.user_id.clone()),
            played_at: Utc::now(),
        }));
        out.broadcast(ServerEvent::GameEnded {
            winner,
            leaderboard,
        });
        self.timer.arm(Phase::Reset, now, self.config.reset_delay);
    }

    fn reset(&mut self, now: Instant, out: &mut Outbox) {
        self.state = GameState::Waiting;
        self.current_round = 0;
        self.current_drawer = None;
        self.current_word.clear();
        self.word_options.clear();
        self.chat.clear();
        self.round_start = None;
        for player in &mut self.players {
            player.score = 0;
            player.has_guessed_correctly = false;
        }
        for score in self.scores.values_mut() {
            *score = 0;
        }
        info!(room_id = %self.id, players = self.players.len(), "room reset");

        out.broadcast(ServerEvent::RoomReset {
            players: self.players.clone(),
            game_state: self.state,
        });

        if self.players.len() >= self.config.min_players {
            self.start_game(now, out);
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// True when at least one non-drawer is present and all of them have
    /// found the word.
    fn everyone_guessed(&self) -> bool {
        let mut guessers = self
            .players
            .iter()
            .filter(|p| Some(p.id) != self.current_drawer)
            .peekable();
        guessers.peek().is_some() && guessers.all(|p| p.has_guessed_correctly)
    }

    fn activity(&self) -> StoreRecord {
        StoreRecord::Activity(RoomActivity {
            id: self.id.clone(),
            player_count: self.players.len(),
            last_active: Utc::now(),
        })
    }
}
