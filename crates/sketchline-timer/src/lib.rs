//! Single-slot phase timer for Sketchline rooms.
//!
//! A room has at most one scheduled transition pending at any time: the
//! game-start countdown, the word-selection timeout, the round timeout,
//! the intermission, or the post-game reset delay. [`PhaseTimer`] models
//! that slot directly. Arming replaces whatever was armed before, so
//! cancellation is structural rather than a separate bookkeeping step.
//!
//! Every arming is stamped with a generation number. A firing that was
//! already in flight when the slot was re-armed carries the old
//! generation, and [`PhaseTimer::claim`] rejects it.
//!
//! # Integration
//!
//! The timer sits inside a room actor's `tokio::select!` loop next to the
//! command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         armed = sketchline_timer::fire(room.armed_timer()) => {
//!             room.on_timer(armed, Instant::now(), &mut out);
//!         }
//!     }
//! }
//! ```
//!
//! The timer itself never sleeps; it only records what is due and when.
//! That keeps the room state machine pure and lets tests drive timer
//! firings by hand.

use std::time::{Duration, Instant};

use tokio::time::{self, Instant as TokioInstant};
use tracing::trace;

// ---------------------------------------------------------------------------
// Armed
// ---------------------------------------------------------------------------

/// A snapshot of the armed slot: what fires, when, and under which
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed<K> {
    kind: K,
    deadline: Instant,
    generation: u64,
}

impl<K: Copy> Armed<K> {
    /// The transition this timer triggers.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// When the timer is due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The arming generation this snapshot belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// PhaseTimer
// ---------------------------------------------------------------------------

/// One slot, replace to cancel.
#[derive(Debug, Clone)]
pub struct PhaseTimer<K> {
    slot: Option<Armed<K>>,
    generation: u64,
}

impl<K> Default for PhaseTimer<K> {
    fn default() -> Self {
        Self {
            slot: None,
            generation: 0,
        }
    }
}

impl<K: Copy + std::fmt::Debug> PhaseTimer<K> {
    /// An empty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `kind` to fire `after` from `now`, replacing (and thereby
    /// cancelling) whatever was armed.
    pub fn arm(&mut self, kind: K, now: Instant, after: Duration) -> Armed<K> {
        self.generation += 1;
        if let Some(previous) = self.slot {
            trace!(
                replaced = ?previous.kind,
                generation = previous.generation,
                "phase timer replaced"
            );
        }
        let armed = Armed {
            kind,
            deadline: now + after,
            generation: self.generation,
        };
        self.slot = Some(armed);
        trace!(
            ?kind,
            generation = self.generation,
            after_ms = after.as_millis() as u64,
            "phase timer armed"
        );
        armed
    }

    /// Clears the slot. Any in-flight firing becomes stale.
    pub fn cancel(&mut self) {
        if let Some(previous) = self.slot.take() {
            self.generation += 1;
            trace!(
                cancelled = ?previous.kind,
                generation = previous.generation,
                "phase timer cancelled"
            );
        }
    }

    /// The currently armed slot, if any.
    pub fn armed(&self) -> Option<Armed<K>> {
        self.slot
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Accepts a firing if it belongs to the current arming.
    ///
    /// Returns `true` and empties the slot when `fired` is the armed
    /// generation. Returns `false` (leaving the slot untouched) for a
    /// stale firing.
    pub fn claim(&mut self, fired: &Armed<K>) -> bool {
        match self.slot {
            Some(current) if current.generation == fired.generation => {
                self.slot = None;
                true
            }
            _ => {
                trace!(
                    kind = ?fired.kind,
                    generation = fired.generation,
                    current = self.generation,
                    "stale phase timer discarded"
                );
                false
            }
        }
    }

    /// Time left until the armed deadline, or `None` when nothing is armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.slot
            .map(|armed| armed.deadline.saturating_duration_since(now))
    }

    /// The generation of the most recent arm or cancel.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// Waiting
// ---------------------------------------------------------------------------

/// Resolves when `armed` is due and returns it.
///
/// With nothing armed this future pends forever; inside `tokio::select!`
/// the other branches keep running. Deadlines are converted to Tokio
/// instants so a paused test clock drives them.
pub async fn fire<K: Copy>(armed: Option<Armed<K>>) -> Armed<K> {
    let Some(armed) = armed else {
        return std::future::pending().await;
    };
    time::sleep_until(TokioInstant::from_std(armed.deadline)).await;
    armed
}
