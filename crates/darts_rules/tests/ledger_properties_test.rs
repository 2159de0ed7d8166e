//! PROPERTY-BASED TESTS: ledger replay invariants
//!
//! Key invariants:
//! 1. Reading standings twice without a mutation yields identical results
//! 2. Submitting a turn and undoing it restores the exact prior standings
//! 3. Restoring from stored turns in any order reproduces the live leg

use darts_rules::{
    Dart, GameKind, InvariantSet, LegInvariants, Match, MatchConfig, Orchestrator, Player,
};
use proptest::prelude::*;

// Strategy for generating any dart that exists on a board
fn dart_strategy() -> impl Strategy<Value = Dart> {
    prop_oneof![
        8 => (1u8..=20, 1u8..=3).prop_map(|(s, m)| Dart::new(s, m).unwrap()),
        1 => (1u8..=2).prop_map(|m| Dart::new(25, m).unwrap()),
        1 => Just(Dart::bull()),
        1 => Just(Dart::miss()),
    ]
}

// Strategy for a single turn of 1-3 darts
fn turn_strategy() -> impl Strategy<Value = Vec<Dart>> {
    prop::collection::vec(dart_strategy(), 1..=3)
}

// Strategy for a game configuration
fn config_strategy() -> impl Strategy<Value = MatchConfig> {
    prop_oneof![
        (prop_oneof![Just(101u32), Just(301), Just(501)], any::<bool>())
            .prop_map(|(start, double_out)| MatchConfig::x01(start).with_double_out(double_out)),
        Just(MatchConfig::new(GameKind::Cricket)),
        Just(MatchConfig::new(GameKind::Baseball)),
        Just(MatchConfig::new(GameKind::AroundTheWorld)),
    ]
}

fn new_leg(config: MatchConfig, players: usize) -> Orchestrator {
    let roster = (0..players)
        .map(|i| Player::with_id(format!("p{i}"), format!("Player {i}")))
        .collect();
    Orchestrator::new(Match::new("match".into(), config, roster), "leg".into())
}

/// Plays turns for whoever is active until the leg ends or turns run out.
fn play_out(game: &mut Orchestrator, turns: Vec<Vec<Dart>>) {
    for darts in turns {
        if game.winner().is_some() {
            break;
        }
        let player = game.active_player().unwrap().clone();
        game.submit_turn(&player, darts).unwrap();
    }
}

proptest! {
    /// Standings are a pure function of the ledger
    #[test]
    fn prop_standings_read_is_idempotent(
        config in config_strategy(),
        players in 1usize..=4,
        turns in prop::collection::vec(turn_strategy(), 0..40),
    ) {
        let mut game = new_leg(config, players);
        play_out(&mut game, turns);

        prop_assert_eq!(game.standings(), game.standings());
        prop_assert_eq!(game.derived_winner(), game.winner().cloned());
        prop_assert!(LegInvariants::check_all(&game).is_ok());
    }

    /// submit_turn followed by undo_last is an exact inverse
    #[test]
    fn prop_undo_inverts_submit(
        config in config_strategy(),
        players in 1usize..=4,
        turns in prop::collection::vec(turn_strategy(), 0..30),
        candidate in turn_strategy(),
    ) {
        let mut game = new_leg(config, players);
        play_out(&mut game, turns);
        prop_assume!(game.winner().is_none());

        let standings = game.standings();
        let ledger = game.leg().ledger().clone();
        let active = game.active_player().unwrap().clone();

        game.submit_turn(&active, candidate).unwrap();
        let undone = game.undo_last().unwrap();

        prop_assert_eq!(undone.standings(), &standings);
        prop_assert_eq!(game.leg().ledger(), &ledger);
        prop_assert_eq!(game.active_player().unwrap(), &active);
        prop_assert!(game.winner().is_none());
        prop_assert!(LegInvariants::check_all(&game).is_ok());
    }

    /// A store may hand turns back in any order
    #[test]
    fn prop_restore_is_order_insensitive(
        config in config_strategy(),
        players in 1usize..=4,
        turns in prop::collection::vec(turn_strategy(), 1..30),
        seed in any::<u64>(),
    ) {
        let mut game = new_leg(config, players);
        play_out(&mut game, turns);

        let mut stored = game.leg().ledger().ordered().to_vec();
        let len = stored.len();
        stored.rotate_left((seed as usize) % len);
        stored.reverse();

        let restored = Orchestrator::restore(game.game().clone(), "leg".into(), stored, None);
        prop_assert_eq!(restored.standings(), game.standings());
        prop_assert_eq!(restored.winner(), game.winner());
        prop_assert_eq!(restored.active_player().unwrap(), game.active_player().unwrap());
    }
}
