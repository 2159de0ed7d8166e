//! Sequence invariant: turn sequences are exactly `0..N-1`.

use super::Invariant;
use crate::orchestrator::Orchestrator;

/// Invariant: turn sequences form a contiguous, strictly increasing range.
///
/// Rotation and undo both assume the N-th turn carries sequence N-1.
pub struct ContiguousSequenceInvariant;

impl Invariant<Orchestrator> for ContiguousSequenceInvariant {
    fn holds(game: &Orchestrator) -> bool {
        game.leg().ledger().is_contiguous()
    }

    fn description() -> &'static str {
        "Turn sequences are contiguous from zero"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{darts, orchestrator};
    use crate::{MatchConfig, Turn, TurnLedger};
    use chrono::Utc;

    #[test]
    fn test_appended_turns_hold() {
        let mut game = orchestrator(MatchConfig::x01(501), 3);
        for player in ["p0", "p1", "p2", "p0"] {
            game.submit_turn(player, darts(&["S5"])).unwrap();
        }
        assert!(ContiguousSequenceInvariant::holds(&game));
    }

    #[test]
    fn test_gap_violates() {
        let mut game = orchestrator(MatchConfig::x01(501), 2);
        let now = Utc::now();
        game.leg.ledger = TurnLedger::from_turns(vec![
            Turn::new(0, now, "p0".into(), darts(&["S5"]), 5, false, None),
            Turn::new(2, now, "p1".into(), darts(&["S5"]), 5, false, None),
        ]);
        assert!(!ContiguousSequenceInvariant::holds(&game));
    }
}
