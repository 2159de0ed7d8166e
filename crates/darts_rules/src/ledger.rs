//! Append-only, undoable turn ledger for one leg.
//!
//! The ledger is the only source of truth every engine replays. Turns are
//! kept in canonical `(sequence, recorded_at)` order regardless of the
//! order a store hands them back in.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::dart::Dart;
use crate::engine::TurnScore;
use crate::error::ScoringError;
use crate::player::PlayerId;

/// One player's visit to the board: 1-3 darts plus the engine's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct Turn {
    /// Position in the leg, 0-based and contiguous.
    sequence: u32,
    /// Creation time; tie-break only.
    recorded_at: DateTime<Utc>,
    /// Player who threw.
    player: PlayerId,
    /// Darts in throw order.
    darts: Vec<Dart>,
    /// Engine-defined total: points, marks-derived points, or steps advanced.
    total: u32,
    /// X01 bust flag; always false elsewhere.
    bust: bool,
    /// Baseball inning (1-9); `None` for other games.
    inning: Option<u8>,
}

/// Ordered turn history for a leg.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnLedger {
    turns: Vec<Turn>,
}

impl TurnLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from stored turns in any order.
    #[instrument(skip(turns), fields(count = turns.len()))]
    pub fn from_turns(mut turns: Vec<Turn>) -> Self {
        turns.sort_by(|a, b| {
            a.sequence
                .cmp(&b.sequence)
                .then(a.recorded_at.cmp(&b.recorded_at))
        });
        let ledger = Self { turns };
        if !ledger.is_contiguous() {
            warn!(count = ledger.len(), "Stored turns have gaps or duplicate sequences");
        }
        ledger
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true when no turns are recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Sequence the next appended turn receives.
    pub fn next_sequence(&self) -> u32 {
        self.turns.len() as u32
    }

    /// Records a scored turn at the end of the ledger.
    #[instrument(skip_all, fields(sequence = self.next_sequence(), player = %player))]
    pub fn append(
        &mut self,
        player: PlayerId,
        darts: Vec<Dart>,
        score: TurnScore,
        recorded_at: DateTime<Utc>,
    ) -> &Turn {
        let turn = Turn::new(
            self.next_sequence(),
            recorded_at,
            player,
            darts,
            score.total,
            score.bust,
            score.inning,
        );
        debug!(total = turn.total, bust = turn.bust, "Turn appended");
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Removes the turn with the highest sequence (latest timestamp on ties).
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyLedger`] if there is nothing to undo.
    #[instrument(skip(self), fields(count = self.len()))]
    pub fn remove_last(&mut self) -> Result<Turn, ScoringError> {
        let turn = self.turns.pop().ok_or(ScoringError::EmptyLedger)?;
        debug!(sequence = turn.sequence, player = %turn.player, "Turn removed");
        Ok(turn)
    }

    /// Turns in canonical read order.
    pub fn ordered(&self) -> &[Turn] {
        &self.turns
    }

    /// Most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Whether sequences are exactly `0..len`.
    pub fn is_contiguous(&self) -> bool {
        self.turns
            .iter()
            .enumerate()
            .all(|(i, t)| t.sequence as usize == i)
    }
}
