//! Match orchestration: one leg, one engine, one ledger.
//!
//! The orchestrator owns the ledger for the duration of a call. It validates
//! a submission, asks the engine to score it, appends the turn and re-derives
//! the winner. Undo pops the last turn and clears the winner.

use std::collections::BTreeMap;

use chrono::Utc;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::contracts::{Contract, TurnContract, TurnSubmission};
use crate::dart::Dart;
use crate::engine::{Engine, MatchConfig, ScoringEngine, Standings};
use crate::error::ScoringError;
use crate::ledger::{Turn, TurnLedger};
use crate::player::{Player, PlayerId, PlayerOrder};
use crate::rotation::active_player;

/// Unique identifier for a match.
pub type MatchId = String;

/// Unique identifier for a leg.
pub type LegId = String;

/// A match: rules, roster, and the turn order frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Match {
    /// Match id.
    id: MatchId,
    /// Rules for every leg of the match.
    config: MatchConfig,
    /// Players taking part.
    roster: Vec<Player>,
    /// Rotation order.
    order: PlayerOrder,
}

impl Match {
    /// Creates a match, freezing turn order from the roster as given.
    pub fn new(id: MatchId, config: MatchConfig, roster: Vec<Player>) -> Self {
        let order = PlayerOrder::from_players(&roster);
        Self {
            id,
            config,
            roster,
            order,
        }
    }

    /// Rebuilds a match whose order was frozen earlier.
    pub fn with_order(
        id: MatchId,
        config: MatchConfig,
        roster: Vec<Player>,
        order: PlayerOrder,
    ) -> Self {
        Self {
            id,
            config,
            roster,
            order,
        }
    }

    /// Roster entry for a player id.
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id() == id)
    }
}

/// One leg in play.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Leg {
    /// Leg id.
    pub(crate) id: LegId,
    /// Every turn thrown so far.
    pub(crate) ledger: TurnLedger,
    /// Cached winner, kept equal to the derived winner.
    pub(crate) winner: Option<PlayerId>,
    /// X01 remaining per player; empty for other variants.
    pub(crate) remaining: BTreeMap<PlayerId, u32>,
}

impl Leg {
    fn empty(id: LegId) -> Self {
        Self {
            id,
            ledger: TurnLedger::new(),
            winner: None,
            remaining: BTreeMap::new(),
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TurnReport {
    /// The turn as recorded.
    turn: Turn,
    /// Standings after the turn.
    standings: Standings,
    /// Winner, if this turn ended the leg.
    winner: Option<PlayerId>,
}

/// Result of a successful undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UndoReport {
    /// The turn that was removed.
    removed: Turn,
    /// Standings after removal.
    standings: Standings,
}

/// Drives one leg of a match.
#[derive(Debug, Clone, Getters)]
pub struct Orchestrator {
    pub(crate) game: Match,
    pub(crate) leg: Leg,
    pub(crate) engine: Engine,
}

impl Orchestrator {
    /// Starts a fresh leg.
    #[instrument(skip(game), fields(match_id = %game.id, kind = %game.config.kind()))]
    pub fn new(game: Match, leg_id: LegId) -> Self {
        let engine = Engine::for_config(&game.config);
        let mut orchestrator = Self {
            game,
            leg: Leg::empty(leg_id),
            engine,
        };
        orchestrator.rebuild_remaining();
        info!(seats = orchestrator.game.order.len(), "Leg started");
        orchestrator
    }

    /// Rebuilds a leg from stored turns.
    ///
    /// The stored winner is only a cache; the winner derived from the
    /// ledger replaces it when the two disagree.
    #[instrument(skip(game, turns, stored_winner), fields(match_id = %game.id, turns = turns.len()))]
    pub fn restore(
        game: Match,
        leg_id: LegId,
        turns: Vec<Turn>,
        stored_winner: Option<PlayerId>,
    ) -> Self {
        let engine = Engine::for_config(&game.config);
        let mut orchestrator = Self {
            game,
            leg: Leg {
                id: leg_id,
                ledger: TurnLedger::from_turns(turns),
                winner: None,
                remaining: BTreeMap::new(),
            },
            engine,
        };
        let derived = orchestrator.derived_winner();
        if derived != stored_winner {
            warn!(
                stored = ?stored_winner,
                derived = ?derived,
                "Stored winner disagrees with ledger; using derived winner"
            );
        }
        orchestrator.leg.winner = derived;
        orchestrator.rebuild_remaining();
        orchestrator
    }

    /// Player whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyRoster`] when nobody is seated.
    pub fn active_player(&self) -> Result<&PlayerId, ScoringError> {
        active_player(&self.leg.ledger, &self.game.order)
    }

    /// Validates, scores, and records one turn.
    ///
    /// On any error the leg is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the first failing precondition, in order: `EmptyRoster`,
    /// `LegAlreadyOver`, `NotActivePlayer`, `InvalidDartCount`, `InvalidDart`.
    #[instrument(skip(self, darts), fields(leg_id = %self.leg.id, darts = darts.len()))]
    pub fn submit_turn(
        &mut self,
        player: &str,
        darts: Vec<Dart>,
    ) -> Result<TurnReport, ScoringError> {
        let submission = TurnSubmission::new(player.to_string(), darts);
        TurnContract::pre(self, &submission)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let score = self.engine.score(
            &self.leg.ledger,
            &self.game.order,
            submission.player(),
            submission.darts(),
        )?;
        let turn = self
            .leg
            .ledger
            .append(player.to_string(), submission.darts().clone(), score, Utc::now())
            .clone();
        self.update_remaining(&turn);
        self.leg.winner = self.derived_winner();

        #[cfg(debug_assertions)]
        if let Err(err) = TurnContract::post(&before, self) {
            tracing::error!(error = %err, "Turn broke a leg invariant; rolling back");
            *self = before;
            return Err(err);
        }

        if let Some(winner) = &self.leg.winner {
            info!(winner = %winner, sequence = turn.sequence(), "Leg won");
        }
        debug!(total = turn.total(), bust = turn.bust(), "Turn recorded");

        Ok(TurnReport {
            turn,
            standings: self.standings(),
            winner: self.leg.winner.clone(),
        })
    }

    /// Removes the most recent turn and clears the winner.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyLedger`] when there is nothing to undo.
    #[instrument(skip(self), fields(leg_id = %self.leg.id))]
    pub fn undo_last(&mut self) -> Result<UndoReport, ScoringError> {
        let removed = self.leg.ledger.remove_last()?;
        self.leg.winner = None;
        self.rebuild_remaining();
        info!(sequence = removed.sequence(), player = %removed.player(), "Turn undone");
        Ok(UndoReport {
            removed,
            standings: self.standings(),
        })
    }

    /// Standings replayed from the full ledger.
    pub fn standings(&self) -> Standings {
        self.engine.standings(&self.leg.ledger, &self.game.order)
    }

    /// Cached winner of the leg.
    pub fn winner(&self) -> Option<&PlayerId> {
        self.leg.winner.as_ref()
    }

    /// Winner recomputed from the ledger.
    pub fn derived_winner(&self) -> Option<PlayerId> {
        self.engine.winner(&self.leg.ledger, &self.game.order)
    }

    /// Cached X01 remaining score for a player.
    pub fn cached_remaining(&self, player: &str) -> Option<u32> {
        self.leg.remaining.get(player).copied()
    }

    /// Applies one recorded turn to the X01 cache.
    fn update_remaining(&mut self, turn: &Turn) {
        if !matches!(self.engine, Engine::X01(_)) || *turn.bust() {
            return;
        }
        if let Some(remaining) = self.leg.remaining.get_mut(turn.player()) {
            *remaining = remaining.saturating_sub(*turn.total());
        }
    }

    /// Recomputes the X01 cache from a full replay.
    fn rebuild_remaining(&mut self) {
        self.leg.remaining.clear();
        if let Engine::X01(engine) = &self.engine {
            let replayed = engine.replay(&self.leg.ledger, &self.game.order);
            for row in replayed.rows() {
                self.leg
                    .remaining
                    .insert(row.player().clone(), *row.remaining());
            }
        }
    }
}
