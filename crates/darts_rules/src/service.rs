//! Match service: the caller-facing API keyed by match and leg ids.

use tracing::{debug, info, instrument, warn};

use crate::dart::Dart;
use crate::engine::Standings;
use crate::error::ScoringError;
use crate::orchestrator::{Orchestrator, TurnReport, UndoReport};
use crate::player::Player;
use crate::store::{RecordStore, StoreError};

/// Error from a service call: either the rules refused, or the store failed.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ServiceError {
    /// The submission or undo broke a rule.
    #[display("{}", _0)]
    Scoring(ScoringError),
    /// The record store failed.
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for ServiceError {}

/// Service layer for leg operations.
///
/// Each call rebuilds an [`Orchestrator`] from stored records, runs one
/// operation, and writes the outcome back through the [`RecordStore`].
#[derive(Debug, Clone)]
pub struct MatchService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> MatchService<S> {
    /// Creates a match service backed by the given store.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating MatchService");
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Loads a leg into an orchestrator, repairing a stale stored winner.
    #[instrument(skip(self))]
    fn load(&mut self, match_id: &str, leg_id: &str) -> Result<Orchestrator, ServiceError> {
        let record = self.store.load_match(match_id)?;
        let leg = self.store.load_leg(leg_id)?;
        if leg.match_id() != match_id {
            warn!(owner = %leg.match_id(), "Leg belongs to another match");
            return Err(StoreError::new(format!(
                "Leg '{}' is not part of match '{}'",
                leg_id, match_id
            ))
            .into());
        }

        let (turns, stored_winner) = leg.into_parts();
        let game = Orchestrator::restore(
            record.into_match(),
            leg_id.to_string(),
            turns,
            stored_winner.clone(),
        );
        if game.winner() != stored_winner.as_ref() {
            info!(winner = ?game.winner(), "Correcting stored winner");
            self.store
                .set_winner(leg_id, game.winner().map(String::as_str))?;
        }
        Ok(game)
    }

    /// Submits a turn for `player` and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Scoring`] when the turn is refused, or
    /// [`ServiceError::Store`] when the store cannot load or write.
    #[instrument(skip(self, darts), fields(darts = darts.len()))]
    pub fn submit_turn(
        &mut self,
        match_id: &str,
        leg_id: &str,
        player: &str,
        darts: Vec<Dart>,
    ) -> Result<TurnReport, ServiceError> {
        let mut game = self.load(match_id, leg_id)?;
        let report = game.submit_turn(player, darts)?;

        self.store.append_turn(leg_id, report.turn())?;
        if let Some(winner) = report.winner() {
            self.store.set_winner(leg_id, Some(winner.as_str()))?;
        }
        debug!(sequence = report.turn().sequence(), "Turn persisted");
        Ok(report)
    }

    /// Removes the last turn of a leg and clears its winner.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyLedger`] (wrapped) when there is nothing
    /// to undo, or a store error.
    #[instrument(skip(self))]
    pub fn undo_last(&mut self, match_id: &str, leg_id: &str) -> Result<UndoReport, ServiceError> {
        let mut game = self.load(match_id, leg_id)?;
        let report = game.undo_last()?;

        self.store
            .remove_turn(leg_id, *report.removed().sequence())?;
        self.store.set_winner(leg_id, None)?;
        debug!(sequence = report.removed().sequence(), "Turn removal persisted");
        Ok(report)
    }

    /// Standings replayed from the stored ledger.
    ///
    /// # Errors
    ///
    /// Returns a store error when the match or leg cannot be loaded.
    #[instrument(skip(self))]
    pub fn standings(&mut self, match_id: &str, leg_id: &str) -> Result<Standings, ServiceError> {
        Ok(self.load(match_id, leg_id)?.standings())
    }

    /// The player whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyRoster`] (wrapped) for a match with no
    /// players, or a store error.
    #[instrument(skip(self))]
    pub fn active_player(&mut self, match_id: &str, leg_id: &str) -> Result<Player, ServiceError> {
        let game = self.load(match_id, leg_id)?;
        let id = game.active_player()?;
        game.game()
            .player(id)
            .cloned()
            .ok_or_else(|| ScoringError::UnknownPlayer(id.clone()).into())
    }
}
