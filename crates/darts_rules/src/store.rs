//! Record store collaborator: where matches, legs, and turns live.
//!
//! The core issues reads and write commands through [`RecordStore`]; the
//! implementation owns durability. [`MemoryStore`] keeps everything in maps.

use std::collections::HashMap;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::engine::MatchConfig;
use crate::ledger::Turn;
use crate::orchestrator::{LegId, Match, MatchId};
use crate::player::{Player, PlayerId, PlayerOrder};

/// Store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A stored match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct MatchRecord {
    /// Match id.
    id: MatchId,
    /// Rules.
    config: MatchConfig,
    /// Players, in any order.
    roster: Vec<Player>,
    /// Turn order frozen at creation.
    order: PlayerOrder,
}

impl MatchRecord {
    /// Converts into the in-play match.
    pub fn into_match(self) -> Match {
        Match::with_order(self.id, self.config, self.roster, self.order)
    }
}

/// A stored leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LegRecord {
    /// Leg id.
    id: LegId,
    /// Owning match.
    match_id: MatchId,
    /// Turns in whatever order the store returns them.
    turns: Vec<Turn>,
    /// Persisted winner cache.
    winner: Option<PlayerId>,
}

impl LegRecord {
    /// Splits into turns and winner.
    pub fn into_parts(self) -> (Vec<Turn>, Option<PlayerId>) {
        (self.turns, self.winner)
    }
}

/// Persistence collaborator consumed by the match service.
///
/// Writes must be visible to the next read in the same session.
pub trait RecordStore {
    /// Loads a match by id.
    fn load_match(&self, match_id: &str) -> Result<MatchRecord, StoreError>;

    /// Loads a leg with all of its turns.
    fn load_leg(&self, leg_id: &str) -> Result<LegRecord, StoreError>;

    /// Appends a turn to a leg.
    fn append_turn(&mut self, leg_id: &str, turn: &Turn) -> Result<(), StoreError>;

    /// Removes the turn with the given sequence from a leg.
    fn remove_turn(&mut self, leg_id: &str, sequence: u32) -> Result<(), StoreError>;

    /// Sets or clears a leg's winner.
    fn set_winner(&mut self, leg_id: &str, winner: Option<&str>) -> Result<(), StoreError>;
}

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    matches: HashMap<MatchId, MatchRecord>,
    legs: HashMap<LegId, LegRecord>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a match with one empty leg, returning both ids.
    #[instrument(skip(self, roster), fields(players = roster.len()))]
    pub fn create_match(&mut self, config: MatchConfig, roster: Vec<Player>) -> (MatchId, LegId) {
        let match_id = uuid::Uuid::new_v4().to_string();
        let leg_id = uuid::Uuid::new_v4().to_string();
        let order = PlayerOrder::from_players(&roster);
        self.matches.insert(
            match_id.clone(),
            MatchRecord::new(match_id.clone(), config, roster, order),
        );
        self.legs.insert(
            leg_id.clone(),
            LegRecord::new(leg_id.clone(), match_id.clone(), Vec::new(), None),
        );
        info!(match_id = %match_id, leg_id = %leg_id, "Match created");
        (match_id, leg_id)
    }

    fn leg_mut(&mut self, leg_id: &str) -> Result<&mut LegRecord, StoreError> {
        self.legs
            .get_mut(leg_id)
            .ok_or_else(|| StoreError::new(format!("Leg '{}' not found", leg_id)))
    }
}

impl RecordStore for MemoryStore {
    #[instrument(skip(self))]
    fn load_match(&self, match_id: &str) -> Result<MatchRecord, StoreError> {
        self.matches
            .get(match_id)
            .cloned()
            .ok_or_else(|| StoreError::new(format!("Match '{}' not found", match_id)))
    }

    #[instrument(skip(self))]
    fn load_leg(&self, leg_id: &str) -> Result<LegRecord, StoreError> {
        self.legs
            .get(leg_id)
            .cloned()
            .ok_or_else(|| StoreError::new(format!("Leg '{}' not found", leg_id)))
    }

    #[instrument(skip(self, turn), fields(sequence = turn.sequence()))]
    fn append_turn(&mut self, leg_id: &str, turn: &Turn) -> Result<(), StoreError> {
        self.leg_mut(leg_id)?.turns.push(turn.clone());
        debug!("Turn stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove_turn(&mut self, leg_id: &str, sequence: u32) -> Result<(), StoreError> {
        let leg = self.leg_mut(leg_id)?;
        // Duplicated sequences lose only their latest copy, as the ledger does.
        let latest = leg
            .turns
            .iter()
            .enumerate()
            .filter(|(_, t)| *t.sequence() == sequence)
            .max_by_key(|(_, t)| *t.recorded_at())
            .map(|(index, _)| index);
        let Some(index) = latest else {
            warn!("No stored turn with that sequence");
            return Err(StoreError::new(format!(
                "Leg '{}' has no turn {}",
                leg_id, sequence
            )));
        };
        leg.turns.remove(index);
        debug!("Turn deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn set_winner(&mut self, leg_id: &str, winner: Option<&str>) -> Result<(), StoreError> {
        self.leg_mut(leg_id)?.winner = winner.map(str::to_string);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameKind, Turn};
    use chrono::Utc;

    #[test]
    fn test_created_match_freezes_roster_order() {
        let mut store = MemoryStore::new();
        let roster = vec![Player::with_id("b", "Bob"), Player::with_id("a", "Ann")];
        let (match_id, leg_id) = store.create_match(MatchConfig::new(GameKind::Cricket), roster);

        let record = store.load_match(&match_id).unwrap();
        assert_eq!(record.order().ids(), ["b".to_string(), "a".to_string()]);
        assert!(store.load_leg(&leg_id).unwrap().turns().is_empty());
    }

    #[test]
    fn test_remove_missing_turn_fails() {
        let mut store = MemoryStore::new();
        let (_, leg_id) = store.create_match(MatchConfig::x01(301), vec![Player::new("Ann")]);
        let turn = Turn::new(0, Utc::now(), "x".into(), vec![], 0, false, None);
        store.append_turn(&leg_id, &turn).unwrap();

        assert!(store.remove_turn(&leg_id, 3).is_err());
        assert!(store.remove_turn(&leg_id, 0).is_ok());
        assert!(store.load_leg(&leg_id).unwrap().turns().is_empty());
    }

    #[test]
    fn test_remove_turn_takes_only_latest_duplicate() {
        let mut store = MemoryStore::new();
        let (_, leg_id) = store.create_match(MatchConfig::x01(301), vec![Player::new("Ann")]);
        let first = Utc::now();
        let later = first + chrono::Duration::seconds(1);
        let early_turn = Turn::new(0, first, "x".into(), vec![], 20, false, None);
        let late_turn = Turn::new(0, later, "x".into(), vec![], 40, false, None);
        store.append_turn(&leg_id, &late_turn).unwrap();
        store.append_turn(&leg_id, &early_turn).unwrap();

        store.remove_turn(&leg_id, 0).unwrap();

        let turns = store.load_leg(&leg_id).unwrap().turns().clone();
        assert_eq!(turns, vec![early_turn]);
    }

    #[test]
    fn test_unknown_ids_report_location() {
        let store = MemoryStore::new();
        let err = store.load_match("nope").unwrap_err();
        assert!(err.message.contains("nope"));
        assert!(err.file.ends_with("store.rs"));
    }
}
