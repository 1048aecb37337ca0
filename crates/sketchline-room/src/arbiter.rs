//! Guess arbitration and scoring.
//!
//! Pure functions over the round's facts; the room applies the verdict.

use std::time::Duration;

use sketchline_protocol::GameState;

/// What a piece of chat text amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The sender found the word.
    CorrectGuess,
    /// Ordinary chat, recorded and broadcast.
    Chat,
    /// Blank text; dropped without a trace.
    Ignored,
}

/// The facts about the sender that decide a verdict.
#[derive(Debug, Clone, Copy)]
pub struct GuessContext<'a> {
    pub state: GameState,
    pub word: &'a str,
    pub is_drawer: bool,
    pub already_guessed: bool,
}

/// Normalized form used for comparison: trimmed and lower-cased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Judges `text` against the secret word.
///
/// Only an exact (normalized) match counts; there is no partial credit.
/// The drawer always chats, and a player who already found the word
/// chats even when repeating it.
pub fn evaluate(ctx: GuessContext<'_>, text: &str) -> Verdict {
    let guess = normalize(text);
    if guess.is_empty() {
        return Verdict::Ignored;
    }
    if ctx.is_drawer || ctx.already_guessed || ctx.state != GameState::Drawing {
        return Verdict::Chat;
    }
    if !ctx.word.is_empty() && guess == normalize(ctx.word) {
        Verdict::CorrectGuess
    } else {
        Verdict::Chat
    }
}

/// Points for a correct guess after `elapsed` of a round lasting
/// `round_duration`: whole seconds remaining plus `base`.
///
/// Remaining time is clamped to `[0, round_duration]`.
pub fn guess_points(elapsed: Duration, round_duration: Duration, base: u32) -> u32 {
    let remaining = round_duration.saturating_sub(elapsed);
    let secs = u32::try_from(remaining.as_millis() / 1000).unwrap_or(u32::MAX);
    secs.saturating_add(base)
}

/// The drawer's end-of-round bonus.
pub fn drawer_bonus(correct_guessers: usize, per_guess: u32) -> u32 {
    u32::try_from(correct_guessers)
        .unwrap_or(u32::MAX)
        .saturating_mul(per_guess)
}
