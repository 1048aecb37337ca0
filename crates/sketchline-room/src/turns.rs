//! Turn scheduling: who draws, and which word when the drawer does not
//! choose.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::arbiter::normalize;

/// Index of the drawer for `round` (1-based) among `player_count`
/// players, in current join order.
///
/// Keyed to live membership: when players leave, later rounds rotate over
/// the reduced list.
pub fn drawer_index(round: u32, player_count: usize) -> Option<usize> {
    if player_count == 0 {
        return None;
    }
    let zero_based = round.saturating_sub(1) as usize;
    Some(zero_based % player_count)
}

/// Uniformly random member of `options`.
pub fn auto_pick<'a, R: Rng + ?Sized>(options: &'a [String], rng: &mut R) -> Option<&'a String> {
    options.choose(rng)
}

/// The offered option matching `choice`, ignoring case and padding.
pub fn find_option<'a>(options: &'a [String], choice: &str) -> Option<&'a String> {
    let choice = normalize(choice);
    options.iter().find(|o| normalize(o) == choice)
}

/// One `_` per character of `word`, separated by spaces.
pub fn hint_for(word: &str) -> String {
    let mut hint = String::with_capacity(word.len() * 2);
    for (i, _) in word.chars().enumerate() {
        if i > 0 {
            hint.push(' ');
        }
        hint.push('_');
    }
    hint
}
