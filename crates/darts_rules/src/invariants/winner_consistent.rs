//! Winner invariant: the cached winner matches the ledger replay.

use super::Invariant;
use crate::engine::ScoringEngine;
use crate::orchestrator::Orchestrator;

/// Invariant: the leg's winner is set exactly when the engine's win
/// condition holds against the full ledger, and names the same player.
pub struct WinnerConsistentInvariant;

impl Invariant<Orchestrator> for WinnerConsistentInvariant {
    fn holds(game: &Orchestrator) -> bool {
        let derived = game
            .engine()
            .winner(game.leg().ledger(), game.game().order());
        game.leg().winner().as_ref() == derived.as_ref()
    }

    fn description() -> &'static str {
        "Leg winner matches the winner derived from the ledger"
    }
}
