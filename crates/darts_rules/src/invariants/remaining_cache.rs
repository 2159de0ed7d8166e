//! X01 cache invariant: cached remaining scores reconcile with replay.

use super::Invariant;
use crate::engine::Engine;
use crate::orchestrator::Orchestrator;

/// Invariant: every cached X01 remaining score equals the replayed one.
///
/// The cache is an optimization only; other variants keep it empty.
pub struct RemainingCacheInvariant;

impl Invariant<Orchestrator> for RemainingCacheInvariant {
    fn holds(game: &Orchestrator) -> bool {
        let Engine::X01(engine) = game.engine() else {
            return game.leg().remaining().is_empty();
        };
        let replayed = engine.replay(game.leg().ledger(), game.game().order());
        replayed.rows().iter().all(|row| {
            game.leg().remaining().get(row.player()) == Some(row.remaining())
        }) && game.leg().remaining().len() == replayed.rows().len()
    }

    fn description() -> &'static str {
        "Cached X01 remaining scores match the ledger replay"
    }
}
