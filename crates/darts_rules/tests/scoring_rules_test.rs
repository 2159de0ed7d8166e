//! Tests for per-variant scoring rules through the orchestrator.

use darts_rules::{
    CricketTarget, Dart, GameKind, Match, MatchConfig, Orchestrator, Player, ScoringError,
    Standings,
};

fn darts(notation: &[&str]) -> Vec<Dart> {
    notation.iter().map(|d| d.parse().unwrap()).collect()
}

fn leg(config: MatchConfig, names: &[&str]) -> Orchestrator {
    let roster = names.iter().map(|n| Player::with_id(*n, *n)).collect();
    Orchestrator::new(Match::new("match".into(), config, roster), "leg".into())
}

/// Plays `(player, "T20 S5 M")` turns in order, panicking on any refusal.
fn play(game: &mut Orchestrator, turns: &[(&str, &str)]) {
    for (player, notation) in turns {
        let thrown: Vec<&str> = notation.split_whitespace().collect();
        game.submit_turn(player, darts(&thrown))
            .unwrap_or_else(|e| panic!("{player} {notation} refused: {e}"));
    }
}

fn x01_remaining(game: &Orchestrator, player: &str) -> u32 {
    match game.standings() {
        Standings::X01(s) => s.remaining_for(player).unwrap(),
        other => panic!("Expected X01 standings, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────
//  X01
// ─────────────────────────────────────────────────────────────

#[test]
fn test_x01_overshoot_by_one_busts() {
    let mut game = leg(MatchConfig::x01(40), &["a", "b"]);
    let report = game.submit_turn("a", darts(&["S20", "S20", "S1"])).unwrap();

    assert!(*report.turn().bust());
    assert_eq!(*report.turn().total(), 0);
    assert_eq!(x01_remaining(&game, "a"), 40);
    assert_eq!(game.active_player().unwrap(), "b");
}

#[test]
fn test_x01_single_finish_busts_with_double_out() {
    let mut game = leg(MatchConfig::x01(2), &["a", "b"]);
    let report = game.submit_turn("a", darts(&["S2"])).unwrap();
    assert!(*report.turn().bust());
    assert!(report.winner().is_none());
}

#[test]
fn test_x01_single_finish_wins_without_double_out() {
    let mut game = leg(MatchConfig::x01(2).with_double_out(false), &["a", "b"]);
    let report = game.submit_turn("a", darts(&["S2"])).unwrap();
    assert_eq!(report.winner().as_deref(), Some("a"));
}

#[test]
fn test_x01_170_checkout_on_bull() {
    let mut game = leg(MatchConfig::x01(170), &["a", "b"]);
    let report = game.submit_turn("a", darts(&["T20", "T20", "BULL"])).unwrap();

    assert_eq!(*report.turn().total(), 170);
    assert_eq!(x01_remaining(&game, "a"), 0);
    assert_eq!(game.winner().map(String::as_str), Some("a"));
}

#[test]
fn test_x01_overshoot_keeps_prior_remaining() {
    let mut game = leg(MatchConfig::x01(301), &["a", "b"]);
    play(
        &mut game,
        &[
            ("a", "T20 T20 T20"),
            ("b", "T20 T20 T20"),
            ("a", "T20 T20 T20"),
            ("b", "T20 T20 T20"),
        ],
    );
    assert_eq!(x01_remaining(&game, "a"), 121);
    assert_eq!(game.cached_remaining("b"), Some(121));
    match game.standings() {
        Standings::X01(s) => assert!(s.rows().iter().all(|r| *r.busts() == 1)),
        other => panic!("Expected X01 standings, got {other:?}"),
    }
}

// ─────────────────────────────────────────────────────────────
//  Cricket
// ─────────────────────────────────────────────────────────────

fn cricket_points(game: &Orchestrator, player: &str) -> u32 {
    match game.standings() {
        Standings::Cricket(s) => *s.row(player).unwrap().points(),
        other => panic!("Expected Cricket standings, got {other:?}"),
    }
}

#[test]
fn test_cricket_overflow_scores_while_opponent_open() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["a", "b"]);
    play(&mut game, &[("a", "T20"), ("b", "M"), ("a", "T20")]);
    assert_eq!(cricket_points(&game, "a"), 60);
}

#[test]
fn test_cricket_overflow_dead_once_everyone_closed() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["a", "b"]);
    play(&mut game, &[("a", "T20"), ("b", "T20"), ("a", "T20")]);
    assert_eq!(cricket_points(&game, "a"), 0);
    assert_eq!(cricket_points(&game, "b"), 0);
}

#[test]
fn test_cricket_bull_marks() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["a", "b"]);
    play(&mut game, &[("a", "50 25"), ("b", "M"), ("a", "D25")]);

    match game.standings() {
        Standings::Cricket(s) => {
            let row = s.row("a").unwrap();
            assert_eq!(row.marks_on(CricketTarget::Bull), 3);
            assert_eq!(*row.points(), 50);
        }
        other => panic!("Expected Cricket standings, got {other:?}"),
    }
}

#[test]
fn test_cricket_closing_everything_while_level_wins() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["a", "b"]);
    play(
        &mut game,
        &[
            ("a", "T20 T19 T18"),
            ("b", "M"),
            ("a", "T17 T16 T15"),
            ("b", "S3"),
        ],
    );
    assert!(game.winner().is_none());

    let report = game.submit_turn("a", darts(&["50", "25"])).unwrap();
    assert_eq!(report.winner().as_deref(), Some("a"));
}

#[test]
fn test_cricket_closing_everything_while_trailing_does_not_win() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["a", "b"]);
    play(
        &mut game,
        &[
            ("a", "M"),
            ("b", "T20 T20"),
            ("a", "T20 T19 T18"),
            ("b", "M"),
            ("a", "T17 T16 T15"),
            ("b", "M"),
            ("a", "50 25"),
        ],
    );
    assert_eq!(cricket_points(&game, "b"), 60);
    assert!(game.winner().is_none());
    assert_eq!(game.active_player().unwrap(), "b");
}

// ─────────────────────────────────────────────────────────────
//  Baseball
// ─────────────────────────────────────────────────────────────

fn baseball(game: &Orchestrator) -> darts_rules::BaseballStandings {
    match game.standings() {
        Standings::Baseball(s) => s,
        other => panic!("Expected Baseball standings, got {other:?}"),
    }
}

#[test]
fn test_baseball_inning_advances_after_full_round() {
    let mut game = leg(MatchConfig::new(GameKind::Baseball), &["a", "b"]);
    let first = game.submit_turn("a", darts(&["S7", "D3"])).unwrap();
    assert_eq!(*first.turn().inning(), Some(1));
    assert_eq!(*first.turn().total(), 3);

    let second = game.submit_turn("b", darts(&["M"])).unwrap();
    assert_eq!(*second.turn().inning(), Some(1));
    assert_eq!(*baseball(&game).current_inning(), 2);

    let third = game.submit_turn("a", darts(&["T1"])).unwrap();
    assert_eq!(*third.turn().inning(), Some(2));
    assert_eq!(baseball(&game).row("a").unwrap().innings()[1], 3);
}

#[test]
fn test_baseball_winner_only_after_nine_innings() {
    let mut game = leg(MatchConfig::new(GameKind::Baseball), &["a", "b"]);
    for inning in 1..=9 {
        game.submit_turn("a", darts(&["S1"])).unwrap();
        let report = game.submit_turn("b", darts(&["D1"])).unwrap();
        if inning < 9 {
            assert!(report.winner().is_none(), "winner before inning {inning} ended");
        }
    }
    assert_eq!(game.winner().map(String::as_str), Some("b"));
    assert_eq!(*baseball(&game).row("b").unwrap().total(), 18);
    assert!(*baseball(&game).complete());
}

#[test]
fn test_baseball_tie_goes_to_first_seat() {
    let mut game = leg(MatchConfig::new(GameKind::Baseball), &["a", "b", "c"]);
    for _ in 0..9 {
        game.submit_turn("a", darts(&["S1"])).unwrap();
        game.submit_turn("b", darts(&["M"])).unwrap();
        game.submit_turn("c", darts(&["S20"])).unwrap();
    }
    assert_eq!(game.winner().map(String::as_str), Some("a"));
}

// ─────────────────────────────────────────────────────────────
//  Around the World
// ─────────────────────────────────────────────────────────────

#[test]
fn test_around_the_world_first_to_finish_wins() {
    let mut game = leg(MatchConfig::new(GameKind::AroundTheWorld), &["a", "b"]);
    let mut next = 1u8;
    loop {
        let throw: Vec<String> = (next..next + 3)
            .filter(|t| *t <= 20)
            .map(|t| format!("S{t}"))
            .collect();
        let notation: Vec<&str> = throw.iter().map(String::as_str).collect();
        let report = game.submit_turn("a", darts(&notation)).unwrap();
        next += notation.len() as u8;
        if report.winner().is_some() {
            break;
        }
        game.submit_turn("b", darts(&["S1", "S3"])).unwrap();
    }

    assert_eq!(game.winner().map(String::as_str), Some("a"));
    match game.standings() {
        Standings::AroundTheWorld(s) => {
            assert_eq!(s.next_target_for("a"), Some(21));
            assert!(s.next_target_for("b").unwrap() <= 21);
        }
        other => panic!("Expected Around the World standings, got {other:?}"),
    }
}

#[test]
fn test_around_the_world_total_counts_steps() {
    let mut game = leg(MatchConfig::new(GameKind::AroundTheWorld), &["a", "b"]);
    let report = game.submit_turn("a", darts(&["S1", "T2", "S9"])).unwrap();
    assert_eq!(*report.turn().total(), 2);
}

// ─────────────────────────────────────────────────────────────
//  Rotation and errors
// ─────────────────────────────────────────────────────────────

#[test]
fn test_rotation_after_four_turns_of_three_players() {
    let mut game = leg(MatchConfig::x01(501), &["p1", "p2", "p3"]);
    play(
        &mut game,
        &[("p1", "S1"), ("p2", "S1"), ("p3", "S1"), ("p1", "S1")],
    );
    assert_eq!(game.active_player().unwrap(), "p2");
}

#[test]
fn test_undo_rewinds_rotation() {
    let mut game = leg(MatchConfig::new(GameKind::Cricket), &["p1", "p2"]);
    play(&mut game, &[("p1", "S20"), ("p2", "S19")]);
    let report = game.undo_last().unwrap();
    assert_eq!(report.removed().player(), "p2");
    assert_eq!(game.active_player().unwrap(), "p2");
}

#[test]
fn test_error_messages() {
    let mut game = leg(MatchConfig::x01(501), &["a", "b"]);
    let err = game.submit_turn("b", darts(&["S1"])).unwrap_err();
    assert_eq!(err.to_string(), "It's a's turn, not b's");

    let err = game.submit_turn("a", darts(&["S1", "S1", "S1", "S1"])).unwrap_err();
    assert_eq!(err, ScoringError::InvalidDartCount(4));

    let err = game.undo_last().unwrap_err();
    assert_eq!(err.to_string(), "No turns to undo");
}

#[test]
fn test_empty_roster_is_reported() {
    let game = leg(MatchConfig::new(GameKind::Baseball), &[]);
    assert_eq!(game.active_player(), Err(ScoringError::EmptyRoster));
}
