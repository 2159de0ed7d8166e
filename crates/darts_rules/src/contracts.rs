//! Contract-based validation for turn submission.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use derive_getters::Getters;
use derive_new::new;
use tracing::{instrument, warn};

use crate::dart::Dart;
use crate::error::ScoringError;
use crate::invariants::{InvariantSet, LegInvariants};
use crate::orchestrator::Orchestrator;
use crate::player::PlayerId;
use crate::rotation::active_player;

/// Most darts a player may throw in one turn.
pub const MAX_DARTS_PER_TURN: usize = 3;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} must hold before applying action
/// - Postcondition: {Q(before, after)} must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), ScoringError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), ScoringError>;
}

/// A candidate turn: who is throwing and what landed.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct TurnSubmission {
    /// Submitting player.
    player: PlayerId,
    /// Darts in throw order.
    darts: Vec<Dart>,
}

// ─────────────────────────────────────────────────────────────
//  Turn Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the match has at least one seat.
pub struct RosterSeated;

impl RosterSeated {
    /// Fails with [`ScoringError::EmptyRoster`] on an empty order.
    #[instrument(skip(game))]
    pub fn check(game: &Orchestrator) -> Result<(), ScoringError> {
        if game.game().order().is_empty() {
            warn!(match_id = %game.game().id(), "Match has no seated players");
            Err(ScoringError::EmptyRoster)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the match configuration can be played out.
pub struct PlayableConfig;

impl PlayableConfig {
    /// Fails with [`ScoringError::InvalidStartingScore`] for an X01 start below 2.
    #[instrument(skip(game))]
    pub fn check(game: &Orchestrator) -> Result<(), ScoringError> {
        game.game().config().validate().inspect_err(|err| {
            warn!(match_id = %game.game().id(), error = %err, "Unplayable match configuration");
        })
    }
}

/// Precondition: no winner has been set on the leg.
pub struct LegInProgress;

impl LegInProgress {
    /// Fails with [`ScoringError::LegAlreadyOver`] once a winner is set.
    #[instrument(skip(game))]
    pub fn check(game: &Orchestrator) -> Result<(), ScoringError> {
        match game.leg().winner() {
            Some(winner) => {
                warn!(winner = %winner, "Submission after leg was won");
                Err(ScoringError::LegAlreadyOver)
            }
            None => Ok(()),
        }
    }
}

/// Precondition: it must be the submitting player's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Fails with [`ScoringError::NotActivePlayer`] out of rotation.
    #[instrument(skip(game, submission), fields(player = %submission.player))]
    pub fn check(submission: &TurnSubmission, game: &Orchestrator) -> Result<(), ScoringError> {
        let expected = active_player(game.leg().ledger(), game.game().order())?;
        if *expected != submission.player {
            warn!(expected = %expected, "Turn submitted out of rotation");
            Err(ScoringError::NotActivePlayer {
                expected: expected.clone(),
                got: submission.player.clone(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: one to three darts.
pub struct DartCountInRange;

impl DartCountInRange {
    /// Fails with [`ScoringError::InvalidDartCount`] for 0 or more than 3 darts.
    #[instrument(skip(submission), fields(darts = submission.darts.len()))]
    pub fn check(submission: &TurnSubmission) -> Result<(), ScoringError> {
        let count = submission.darts.len();
        if count == 0 || count > MAX_DARTS_PER_TURN {
            Err(ScoringError::InvalidDartCount(count))
        } else {
            Ok(())
        }
    }
}

/// Precondition: every dart exists on a board.
///
/// Darts built through [`Dart::new`] always pass; deserialized darts
/// bypass that constructor and are re-checked here.
pub struct DartsOnBoard;

impl DartsOnBoard {
    /// Fails with [`ScoringError::InvalidDart`] for the first impossible dart.
    #[instrument(skip(submission))]
    pub fn check(submission: &TurnSubmission) -> Result<(), ScoringError> {
        for dart in &submission.darts {
            Dart::new(dart.segment(), dart.multiplier())?;
        }
        Ok(())
    }
}

/// Composite precondition for a legal turn.
pub struct LegalTurn;

impl LegalTurn {
    /// Validates all preconditions in order.
    #[instrument(skip(submission, game))]
    pub fn check(submission: &TurnSubmission, game: &Orchestrator) -> Result<(), ScoringError> {
        RosterSeated::check(game)?;
        PlayableConfig::check(game)?;
        LegInProgress::check(game)?;
        PlayersTurn::check(submission, game)?;
        DartCountInRange::check(submission)?;
        DartsOnBoard::check(submission)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Turn Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for turn submission.
///
/// Preconditions:
/// - Match has seated players
/// - X01 starting score can be checked out
/// - Leg has no winner yet
/// - Submitting player is the active player
/// - One to three valid darts
///
/// Postconditions:
/// - Ledger grew by exactly one turn
/// - Every leg invariant holds
pub struct TurnContract;

impl Contract<Orchestrator, TurnSubmission> for TurnContract {
    fn pre(game: &Orchestrator, action: &TurnSubmission) -> Result<(), ScoringError> {
        LegalTurn::check(action, game)
    }

    fn post(before: &Orchestrator, after: &Orchestrator) -> Result<(), ScoringError> {
        let grown = after.leg().ledger().len() == before.leg().ledger().len() + 1;
        if !grown {
            return Err(ScoringError::InvariantViolation(
                "Postcondition failed: ledger did not grow by one turn".to_string(),
            ));
        }
        LegInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description)
                .collect::<Vec<_>>()
                .join("; ");
            ScoringError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{darts, orchestrator};
    use crate::{GameKind, Match, MatchConfig, Orchestrator};

    fn submission(player: &str, notation: &[&str]) -> TurnSubmission {
        TurnSubmission::new(player.to_string(), darts(notation))
    }

    #[test]
    fn test_precondition_accepts_active_player() {
        let game = orchestrator(MatchConfig::x01(501), 2);
        assert!(TurnContract::pre(&game, &submission("p0", &["T20"])).is_ok());
    }

    #[test]
    fn test_precondition_wrong_player() {
        let game = orchestrator(MatchConfig::x01(501), 2);
        assert_eq!(
            TurnContract::pre(&game, &submission("p1", &["T20"])),
            Err(ScoringError::NotActivePlayer {
                expected: "p0".to_string(),
                got: "p1".to_string(),
            })
        );
    }

    #[test]
    fn test_precondition_dart_count() {
        let game = orchestrator(MatchConfig::new(GameKind::Cricket), 2);
        assert_eq!(
            TurnContract::pre(&game, &submission("p0", &[])),
            Err(ScoringError::InvalidDartCount(0))
        );
        assert_eq!(
            TurnContract::pre(&game, &submission("p0", &["S1", "S2", "S3", "S4"])),
            Err(ScoringError::InvalidDartCount(4))
        );
    }

    #[test]
    fn test_precondition_rejects_unvalidated_dart() {
        let game = orchestrator(MatchConfig::new(GameKind::Baseball), 2);
        let bogus = Dart::unchecked(21, 1);
        let action = TurnSubmission::new("p0".to_string(), vec![bogus]);
        assert_eq!(
            TurnContract::pre(&game, &action),
            Err(ScoringError::InvalidDart {
                segment: 21,
                multiplier: 1
            })
        );
    }

    #[test]
    fn test_leg_over_checked_before_rotation() {
        let mut game = orchestrator(MatchConfig::x01(40), 2);
        game.submit_turn("p0", darts(&["D20"])).unwrap();
        // p1 is next in rotation, but the leg is already won.
        assert_eq!(
            TurnContract::pre(&game, &submission("p1", &["S1"])),
            Err(ScoringError::LegAlreadyOver)
        );
    }

    #[test]
    fn test_empty_roster_checked_first() {
        let game = Orchestrator::new(
            Match::new("m".into(), MatchConfig::x01(501), Vec::new()),
            "l".into(),
        );
        assert_eq!(
            TurnContract::pre(&game, &submission("p0", &[])),
            Err(ScoringError::EmptyRoster)
        );
    }

    #[test]
    fn test_unplayable_start_refuses_turns() {
        let mut game = orchestrator(MatchConfig::x01(0).with_double_out(false), 2);
        assert_eq!(
            TurnContract::pre(&game, &submission("p0", &["M"])),
            Err(ScoringError::InvalidStartingScore(0))
        );
        assert_eq!(
            game.submit_turn("p0", darts(&["M"])),
            Err(ScoringError::InvalidStartingScore(0))
        );
        assert!(game.winner().is_none());
        assert!(game.leg().ledger().is_empty());
    }

    #[test]
    fn test_postcondition_holds_after_turn() {
        let before = orchestrator(MatchConfig::x01(501), 2);
        let mut after = before.clone();
        after.submit_turn("p0", darts(&["S20"])).unwrap();
        assert!(TurnContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = orchestrator(MatchConfig::x01(501), 2);
        let mut after = before.clone();
        after.submit_turn("p0", darts(&["S20"])).unwrap();
        after.leg.remaining.insert("p0".to_string(), 1);
        assert!(matches!(
            TurnContract::post(&before, &after),
            Err(ScoringError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_postcondition_requires_one_new_turn() {
        let before = orchestrator(MatchConfig::x01(501), 2);
        assert!(TurnContract::post(&before, &before).is_err());
    }
}
