//! Integration tests for the room state machine.
//!
//! The room is driven with explicit instants and explicit timer firings,
//! so event order at round boundaries is pinned by the test itself.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use sketchline_protocol::{GameState, PlayerId, Recipient, RoomId, ServerEvent};
use sketchline_room::{Outbox, Phase, Room, RoomConfig, RoomError, StoreRecord};

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> PlayerId {
    PlayerId(id)
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn pool() -> Vec<String> {
    ["pizza", "taco", "sushi"].map(String::from).to_vec()
}

fn room_with(config: RoomConfig) -> Room {
    Room::with_rng(RoomId::from("abcd"), config, pool(), StdRng::seed_from_u64(42))
}

fn room() -> Room {
    room_with(RoomConfig::default())
}

fn join(room: &mut Room, id: u64, now: Instant) -> Outbox {
    let mut out = Outbox::new();
    room.add_player(pid(id), &format!("u-{id}"), &format!("player{id}"), now, &mut out)
        .unwrap();
    out
}

fn leave(room: &mut Room, id: u64, now: Instant) -> (usize, Outbox) {
    let mut out = Outbox::new();
    let remaining = room.remove_player(pid(id), now, &mut out).unwrap();
    (remaining, out)
}

/// Fires the armed timer at its deadline. Returns the firing time.
fn fire(room: &mut Room) -> (Instant, Outbox) {
    let armed = room.armed_timer().expect("a timer should be armed");
    let mut out = Outbox::new();
    room.on_timer(armed, armed.deadline(), &mut out);
    (armed.deadline(), out)
}

fn say(room: &mut Room, id: u64, text: &str, now: Instant) -> Outbox {
    let mut out = Outbox::new();
    room.submit_text(pid(id), text, now, &mut out);
    out
}

fn choose(room: &mut Room, id: u64, word: &str, now: Instant) -> Outbox {
    let mut out = Outbox::new();
    room.choose_word(pid(id), word, now, &mut out);
    out
}

fn names(out: &Outbox) -> Vec<&'static str> {
    out.events().iter().map(|(_, e)| e.name()).collect()
}

fn assert_scores_consistent(room: &Room) {
    let from_players: u32 = room.players().iter().map(|p| p.score).sum();
    let from_map: u32 = room.scores().values().sum();
    assert_eq!(from_players, from_map);
    for player in room.players() {
        assert_eq!(room.scores().get(&player.id), Some(&player.score));
    }
    assert_eq!(room.scores().len(), room.players().len());
}

/// Two players joined and the countdown fired: round 1 is selecting.
fn started_room(now: Instant) -> (Room, Instant) {
    let mut room = room();
    join(&mut room, 1, now);
    join(&mut room, 2, now);
    let (t, _) = fire(&mut room);
    assert_eq!(room.state(), GameState::SelectingWord);
    (room, t)
}

// =========================================================================
// Membership and auto-start
// =========================================================================

#[test]
fn test_first_player_waits() {
    let mut room = room();
    let out = join(&mut room, 1, Instant::now());
    assert_eq!(room.state(), GameState::Waiting);
    assert!(room.armed_timer().is_none());
    assert_eq!(names(&out), vec!["player-joined"]);
    match &out.events()[0].1 {
        ServerEvent::PlayerJoined {
            players,
            game_state,
        } => {
            assert_eq!(players.len(), 1);
            assert_eq!(*game_state, GameState::Waiting);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(out.records(), [StoreRecord::Activity(a)] if a.player_count == 1));
}

#[test]
fn test_second_player_starts_countdown() {
    let t0 = Instant::now();
    let mut room = room();
    join(&mut room, 1, t0);
    let out = join(&mut room, 2, t0);

    assert_eq!(room.state(), GameState::Starting);
    assert_eq!(room.current_round(), 1);
    assert_eq!(names(&out), vec!["player-joined", "game-starting"]);
    assert!(out.events().iter().any(|(_, e)| matches!(
        e,
        ServerEvent::GameStarting { countdown: 3, message } if message == "Game is starting..."
    )));
    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::Countdown);
    assert_eq!(armed.deadline(), t0 + secs(3));
}

#[test]
fn test_duplicate_join_is_rejected() {
    let mut room = room();
    join(&mut room, 1, Instant::now());
    let mut out = Outbox::new();
    let result = room.add_player(pid(1), "u-1", "again", Instant::now(), &mut out);
    assert!(matches!(result, Err(RoomError::AlreadyInRoom(..))));
    assert!(out.is_empty());
    assert_eq!(room.players().len(), 1);
}

#[test]
fn test_leave_unknown_player_is_rejected() {
    let mut room = room();
    let mut out = Outbox::new();
    let result = room.remove_player(pid(9), Instant::now(), &mut out);
    assert!(matches!(result, Err(RoomError::NotInRoom(..))));
}

#[test]
fn test_last_leave_cancels_timer() {
    let t0 = Instant::now();
    let mut room = room();
    join(&mut room, 1, t0);
    join(&mut room, 2, t0);
    assert!(room.armed_timer().is_some());

    let (remaining, _) = leave(&mut room, 1, t0);
    assert_eq!(remaining, 1);
    let (remaining, out) = leave(&mut room, 2, t0);
    assert_eq!(remaining, 0);
    assert!(room.is_empty());
    assert!(room.armed_timer().is_none());
    assert!(matches!(out.records(), [StoreRecord::Activity(a)] if a.player_count == 0));
}

// =========================================================================
// Round start and word selection
// =========================================================================

#[test]
fn test_round_one_offers_distinct_words_to_first_player() {
    let t0 = Instant::now();
    let mut room = room();
    join(&mut room, 1, t0);
    join(&mut room, 2, t0);
    let (t, out) = fire(&mut room);

    assert_eq!(room.current_drawer(), Some(pid(1)));
    let mut options = room.word_options().to_vec();
    options.sort();
    assert_eq!(options, vec!["pizza", "sushi", "taco"]);

    assert_eq!(names(&out), vec!["round-started", "choose-word"]);
    assert_eq!(out.events()[1].0, Recipient::Player(pid(1)));
    match &out.events()[0].1 {
        ServerEvent::RoundStarted {
            round,
            total_rounds,
            drawer,
            drawer_id,
        } => {
            assert_eq!((*round, *total_rounds), (1, 3));
            assert_eq!(drawer, "player1");
            assert_eq!(*drawer_id, pid(1));
        }
        other => panic!("unexpected event {other:?}"),
    }

    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::WordSelection);
    assert_eq!(armed.deadline(), t + secs(15));
}

#[test]
fn test_drawer_choice_starts_drawing() {
    let (mut room, t) = started_room(Instant::now());
    let out = choose(&mut room, 1, "PIZZA", t + secs(2));

    assert_eq!(room.state(), GameState::Drawing);
    assert_eq!(room.current_word(), "pizza");
    assert!(room.word_options().is_empty());
    assert_eq!(room.round_start(), Some(t + secs(2)));

    assert_eq!(names(&out), vec!["current-word", "word-hint", "drawing-started"]);
    assert_eq!(out.events()[0].0, Recipient::Player(pid(1)));
    assert_eq!(
        out.events()[1],
        (
            Recipient::AllExcept(pid(1)),
            ServerEvent::WordHint {
                hint: "_ _ _ _ _".into()
            }
        )
    );

    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::Round);
    assert_eq!(armed.deadline(), t + secs(2) + secs(80));
}

#[test]
fn test_choice_outside_options_is_ignored() {
    let (mut room, t) = started_room(Instant::now());
    let out = choose(&mut room, 1, "lasagna", t);
    assert!(out.is_empty());
    assert_eq!(room.state(), GameState::SelectingWord);
}

#[test]
fn test_choice_from_non_drawer_is_ignored() {
    let (mut room, t) = started_room(Instant::now());
    let out = choose(&mut room, 2, "pizza", t);
    assert!(out.is_empty());
    assert_eq!(room.state(), GameState::SelectingWord);
}

#[test]
fn test_selection_timeout_picks_offered_word() {
    let (mut room, _) = started_room(Instant::now());
    let offered = room.word_options().to_vec();

    let (t, out) = fire(&mut room);

    assert_eq!(room.state(), GameState::Drawing);
    assert!(offered.contains(&room.current_word().to_string()));
    assert_eq!(names(&out), vec!["current-word", "word-hint", "drawing-started"]);
    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::Round);
    assert_eq!(armed.deadline(), t + secs(80), "full round after auto-pick");
}

// =========================================================================
// Guessing and scoring
// =========================================================================

#[test]
fn test_scenario_abcd_early_end_with_drawer_bonus() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);

    let out = say(&mut room, 2, "pizza", t + secs(40));

    assert_eq!(room.state(), GameState::RoundEnded);
    assert_eq!(room.player(pid(2)).unwrap().score, 90);
    assert_eq!(room.player(pid(1)).unwrap().score, 25);
    assert_scores_consistent(&room);

    assert_eq!(
        names(&out),
        vec!["chat-message", "update-scores", "round-ended", "update-scores"]
    );
    match &out.events()[0].1 {
        ServerEvent::ChatMessage(msg) => {
            assert!(msg.is_system && msg.is_correct_guess);
            assert_eq!(msg.message, "player2 guessed the word!");
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &out.events()[2].1 {
        ServerEvent::RoundEnded { word, scores } => {
            assert_eq!(word, "pizza");
            assert_eq!(scores.get(&pid(1)), Some(&0));
            assert_eq!(scores.get(&pid(2)), Some(&90));
        }
        other => panic!("unexpected event {other:?}"),
    }

    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::Intermission);
    assert_eq!(armed.deadline(), t + secs(40) + secs(10));
}

#[test]
fn test_wrong_guess_is_broadcast_as_chat() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);

    let out = say(&mut room, 2, "pasta?", t + secs(5));
    assert_eq!(names(&out), vec!["chat-message"]);
    assert_eq!(room.chat().len(), 1);
    assert_eq!(room.chat()[0].sender, "player2");
    assert!(!room.player(pid(2)).unwrap().has_guessed_correctly);
}

#[test]
fn test_drawer_typing_the_word_is_chat() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);

    let out = say(&mut room, 1, "pizza", t + secs(5));
    assert_eq!(names(&out), vec!["chat-message"]);
    assert_eq!(room.player(pid(1)).unwrap().score, 0);
    assert_eq!(room.state(), GameState::Drawing);
}

#[test]
fn test_blank_text_is_dropped() {
    let (mut room, t) = started_room(Instant::now());
    let out = say(&mut room, 2, "   ", t);
    assert!(out.is_empty());
    assert!(room.chat().is_empty());
}

#[test]
fn test_repeat_guess_scores_once() {
    let t0 = Instant::now();
    let mut room = room();
    for id in 1..=3 {
        join(&mut room, id, t0);
    }
    let (t, _) = fire(&mut room);
    choose(&mut room, 1, "pizza", t);

    say(&mut room, 2, "pizza", t + secs(10));
    assert_eq!(room.state(), GameState::Drawing, "player 3 still guessing");
    let score = room.player(pid(2)).unwrap().score;
    assert_eq!(score, 120);

    let out = say(&mut room, 2, "pizza", t + secs(20));
    assert_eq!(names(&out), vec!["chat-message"]);
    assert_eq!(room.player(pid(2)).unwrap().score, score);
    assert_scores_consistent(&room);
}

#[test]
fn test_round_timer_ends_round_without_guesses() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);

    let (_, out) = fire(&mut room);
    assert_eq!(room.state(), GameState::RoundEnded);
    assert_eq!(names(&out), vec!["round-ended", "update-scores"]);
    assert_eq!(room.player(pid(1)).unwrap().score, 0);
}

#[test]
fn test_timer_processed_before_guess_wins_race() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);

    let (deadline, _) = fire(&mut room);
    let out = say(&mut room, 2, "pizza", deadline);

    assert_eq!(names(&out), vec!["chat-message"]);
    assert_eq!(room.player(pid(2)).unwrap().score, 0);
}

#[test]
fn test_guess_processed_before_timer_wins_race() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);
    let round_timer = room.armed_timer().unwrap();

    say(&mut room, 2, "pizza", round_timer.deadline());
    assert_eq!(room.player(pid(2)).unwrap().score, 50);

    // The round timer was replaced by the intermission; its firing is stale.
    let mut out = Outbox::new();
    room.on_timer(round_timer, round_timer.deadline(), &mut out);
    assert!(out.is_empty());
    assert_eq!(room.armed_timer().unwrap().kind(), Phase::Intermission);
}

#[test]
fn test_guess_flags_reset_each_round() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);
    say(&mut room, 2, "pizza", t + secs(1));
    assert!(room.player(pid(2)).unwrap().has_guessed_correctly);

    fire(&mut room); // intermission
    assert_eq!(room.state(), GameState::SelectingWord);
    assert_eq!(room.current_round(), 2);
    assert!(room.players().iter().all(|p| !p.has_guessed_correctly));
    assert!(room.current_word().is_empty());
}

// =========================================================================
// Timers
// =========================================================================

#[test]
fn test_stale_selection_timer_is_noop() {
    let (mut room, t) = started_room(Instant::now());
    let selection = room.armed_timer().unwrap();
    choose(&mut room, 1, "taco", t);

    let mut out = Outbox::new();
    room.on_timer(selection, selection.deadline(), &mut out);
    assert!(out.is_empty());
    assert_eq!(room.state(), GameState::Drawing);
    assert_eq!(room.current_word(), "taco");
}

// =========================================================================
// Drawer leaving
// =========================================================================

#[test]
fn test_drawer_disconnect_mid_drawing_advances_immediately() {
    let t0 = Instant::now();
    let mut room = room();
    for id in 1..=3 {
        join(&mut room, id, t0);
    }
    let (t, _) = fire(&mut room);
    choose(&mut room, 1, "pizza", t);

    let (remaining, out) = leave(&mut room, 1, t + secs(5));

    assert_eq!(remaining, 2);
    assert_eq!(
        names(&out),
        vec!["player-left", "drawer-left", "round-started", "choose-word"]
    );
    assert_eq!(room.state(), GameState::SelectingWord);
    assert_eq!(room.current_round(), 2);
    // Reduced list is [2, 3]; round 2 draws players[(2 - 1) % 2].
    assert_eq!(room.current_drawer(), Some(pid(3)));
    assert_scores_consistent(&room);
}

#[test]
fn test_drawer_leaving_while_selecting_advances() {
    let t0 = Instant::now();
    let mut room = room();
    for id in 1..=3 {
        join(&mut room, id, t0);
    }
    let (t, _) = fire(&mut room);
    let (_, out) = leave(&mut room, 1, t + secs(1));

    assert!(names(&out).contains(&"drawer-left"));
    assert_eq!(room.current_round(), 2);
    assert_eq!(room.current_drawer(), Some(pid(3)));
}

#[test]
fn test_drawer_leaving_last_round_ends_game() {
    let t0 = Instant::now();
    let mut room = room_with(RoomConfig {
        total_rounds: 1,
        ..Default::default()
    });
    for id in 1..=3 {
        join(&mut room, id, t0);
    }
    let (t, _) = fire(&mut room);
    let (_, out) = leave(&mut room, 1, t);
    assert_eq!(room.state(), GameState::Ended);
    assert!(names(&out).contains(&"game-ended"));
}

#[test]
fn test_guesser_leaving_can_end_round() {
    let t0 = Instant::now();
    let mut room = room();
    for id in 1..=3 {
        join(&mut room, id, t0);
    }
    let (t, _) = fire(&mut room);
    choose(&mut room, 1, "pizza", t);
    say(&mut room, 2, "pizza", t + secs(20));
    assert_eq!(room.state(), GameState::Drawing);

    let (_, out) = leave(&mut room, 3, t + secs(30));
    assert_eq!(room.state(), GameState::RoundEnded);
    assert!(names(&out).contains(&"round-ended"));
    assert_eq!(room.player(pid(1)).unwrap().score, 25);
}

#[test]
fn test_game_continues_with_one_player() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);
    leave(&mut room, 2, t + secs(1));
    assert_eq!(room.state(), GameState::Drawing);

    fire(&mut room);
    assert_eq!(room.state(), GameState::RoundEnded);
}

// =========================================================================
// Draw pass-through
// =========================================================================

#[test]
fn test_draw_relayed_to_others_only_from_drawer() {
    let (mut room, t) = started_room(Instant::now());
    choose(&mut room, 1, "pizza", t);
    let stroke = serde_json::json!({ "x": 10, "y": 20 });

    let mut out = Outbox::new();
    room.draw(pid(1), stroke.clone(), &mut out);
    assert_eq!(
        out.events(),
        &[(
            Recipient::AllExcept(pid(1)),
            ServerEvent::DrawData { draw_data: stroke.clone() }
        )]
    );

    let mut out = Outbox::new();
    room.draw(pid(2), stroke, &mut out);
    assert!(out.is_empty());
}

#[test]
fn test_clear_canvas_only_from_drawer() {
    let (mut room, _) = started_room(Instant::now());

    let mut out = Outbox::new();
    room.clear_canvas(pid(2), &mut out);
    assert!(out.is_empty());

    room.clear_canvas(pid(1), &mut out);
    assert_eq!(names(&out), vec!["canvas-cleared"]);
}

// =========================================================================
// Full game, end and reset
// =========================================================================

/// Plays three rounds: player 2 guesses in round 1, later rounds time out.
fn play_full_game(room: &mut Room) {
    let t0 = Instant::now();
    join(room, 1, t0);
    join(room, 2, t0);
    let (t, _) = fire(room); // countdown
    choose(room, 1, "pizza", t);
    say(room, 2, "pizza", t + secs(40));
    assert_scores_consistent(room);

    fire(room); // intermission → round 2
    assert_eq!(room.current_drawer(), Some(pid(2)));
    fire(room); // selection timeout
    fire(room); // round timeout
    fire(room); // intermission → round 3
    assert_eq!(room.current_drawer(), Some(pid(1)));
    fire(room); // selection timeout
    fire(room); // round timeout
    assert_scores_consistent(room);
}

#[test]
fn test_game_ends_after_total_rounds() {
    let mut room = room();
    play_full_game(&mut room);

    let (t, out) = fire(&mut room); // intermission → end
    assert_eq!(room.state(), GameState::Ended);
    assert_eq!(names(&out), vec!["game-ended"]);
    match &out.events()[0].1 {
        ServerEvent::GameEnded {
            winner,
            leaderboard,
        } => {
            assert_eq!(winner.as_ref().map(|w| w.id), Some(pid(2)));
            let scores: Vec<u32> = leaderboard.iter().map(|p| p.score).collect();
            assert_eq!(scores, vec![90, 25]);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match out.records() {
        [StoreRecord::Game(record)] => {
            assert_eq!(record.winner.as_deref(), Some("u-2"));
            assert_eq!(record.players.len(), 2);
            assert_eq!(record.players[0].id, "u-1");
        }
        other => panic!("unexpected records {other:?}"),
    }
    let armed = room.armed_timer().unwrap();
    assert_eq!(armed.kind(), Phase::Reset);
    assert_eq!(armed.deadline(), t + secs(10));
}

#[test]
fn test_reset_with_two_players_restarts() {
    let mut room = room();
    play_full_game(&mut room);
    fire(&mut room); // → Ended

    let (_, out) = fire(&mut room); // reset
    assert_eq!(names(&out), vec!["room-reset", "game-starting"]);
    assert_eq!(room.state(), GameState::Starting);
    assert_eq!(room.current_round(), 1);
    assert!(room.chat().is_empty());
    assert!(room.players().iter().all(|p| p.score == 0));
    assert_scores_consistent(&room);
}

#[test]
fn test_reset_with_one_player_stays_waiting() {
    let mut room = room();
    play_full_game(&mut room);
    let (t, _) = fire(&mut room); // → Ended
    leave(&mut room, 2, t + secs(1));

    let (_, out) = fire(&mut room); // reset
    assert_eq!(names(&out), vec!["room-reset"]);
    assert_eq!(room.state(), GameState::Waiting);
    assert_eq!(room.current_round(), 0);
    assert_eq!(room.current_drawer(), None);
    assert!(room.armed_timer().is_none());
}

#[test]
fn test_info_snapshot() {
    let (room, _) = started_room(Instant::now());
    let info = room.info();
    assert_eq!(info.room_id, RoomId::from("abcd"));
    assert_eq!(info.state, GameState::SelectingWord);
    assert_eq!(info.round, 1);
    assert_eq!(info.total_rounds, 3);
    assert_eq!(info.drawer, Some(pid(1)));
    assert_eq!(info.player_count, 2);
}
