//! X01 (301/501) count-down scoring.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{GameKind, ScoringEngine, Standings, TurnScore};
use crate::dart::Dart;
use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};

/// X01 rules for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X01Engine {
    starting: u32,
    double_out: bool,
}

/// Result of applying one turn to a remaining score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct X01Outcome {
    /// Remaining after the turn (unchanged on bust).
    pub remaining: u32,
    /// Points the darts were worth.
    pub scored: u32,
    /// Whether the turn busted.
    pub bust: bool,
}

impl X01Outcome {
    /// Whether the turn checked out.
    pub fn finished(&self) -> bool {
        !self.bust && self.remaining == 0
    }
}

/// One player's X01 standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct X01Row {
    /// Player.
    player: PlayerId,
    /// Points left to check out.
    remaining: u32,
    /// Turns that busted this leg.
    busts: u32,
}

/// X01 standings in frozen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct X01Standings {
    /// One row per seat.
    rows: Vec<X01Row>,
    /// First player to reach exactly zero.
    winner: Option<PlayerId>,
}

impl X01Standings {
    /// Remaining score of a player.
    pub fn remaining_for(&self, player: &str) -> Option<u32> {
        self.rows
            .iter()
            .find(|r| r.player == player)
            .map(|r| r.remaining)
    }

    pub(crate) fn relabel(&mut self, label: &dyn Fn(&str) -> String) {
        for row in &mut self.rows {
            row.player = label(&row.player);
        }
        if let Some(winner) = &mut self.winner {
            *winner = label(winner);
        }
    }
}

impl std::fmt::Display for X01Standings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            writeln!(f, "{:<20} {:>4}", row.player, row.remaining)?;
        }
        Ok(())
    }
}

impl X01Engine {
    /// Creates X01 rules from a starting score.
    pub fn new(starting: u32, double_out: bool) -> Self {
        Self {
            starting,
            double_out,
        }
    }

    /// Starting score.
    pub fn starting(&self) -> u32 {
        self.starting
    }

    /// Whether the finishing dart must be a double.
    pub fn double_out(&self) -> bool {
        self.double_out
    }

    /// Applies a turn to a remaining score.
    ///
    /// Busts, checked in order: overshooting below zero, leaving exactly one,
    /// and (with double-out) reaching zero on a last dart that isn't a double.
    #[instrument(skip(self, darts), fields(darts = darts.len()))]
    pub fn apply(&self, darts: &[Dart], remaining: u32) -> X01Outcome {
        let scored: u32 = darts.iter().map(Dart::value).sum();
        let candidate = i64::from(remaining) - i64::from(scored);
        let last_was_double = darts.last().is_some_and(Dart::is_double);

        let bust = candidate < 0
            || candidate == 1
            || (candidate == 0 && self.double_out && !last_was_double);

        if bust {
            debug!(remaining, scored, "Bust");
            return X01Outcome {
                remaining,
                scored,
                bust: true,
            };
        }

        X01Outcome {
            remaining: candidate as u32,
            scored,
            bust: false,
        }
    }

    /// Replays the ordered ledger into standings.
    #[instrument(skip_all, fields(turns = ledger.len()))]
    pub fn replay(&self, ledger: &TurnLedger, order: &PlayerOrder) -> X01Standings {
        let mut rows: Vec<X01Row> = order
            .iter()
            .map(|id| X01Row {
                player: id.clone(),
                remaining: self.starting,
                busts: 0,
            })
            .collect();
        let mut winner = None;

        for turn in ledger.ordered() {
            let Some(seat) = order.seat_of(turn.player()) else {
                warn!(player = %turn.player(), "Turn by unseated player ignored");
                continue;
            };
            let row = &mut rows[seat];
            let outcome = self.apply(turn.darts(), row.remaining);
            row.remaining = outcome.remaining;
            if outcome.bust {
                row.busts += 1;
            }
            if outcome.finished() {
                winner = Some(row.player.clone());
                break;
            }
        }

        X01Standings { rows, winner }
    }
}

impl ScoringEngine for X01Engine {
    fn kind(&self) -> GameKind {
        GameKind::X01
    }

    fn score(
        &self,
        ledger: &TurnLedger,
        order: &PlayerOrder,
        player: &str,
        darts: &[Dart],
    ) -> Result<TurnScore, ScoringError> {
        if order.is_empty() {
            return Err(ScoringError::EmptyRoster);
        }
        let remaining = self
            .replay(ledger, order)
            .remaining_for(player)
            .ok_or_else(|| ScoringError::UnknownPlayer(player.to_string()))?;
        let outcome = self.apply(darts, remaining);
        Ok(if outcome.bust {
            TurnScore::busted()
        } else {
            TurnScore::points(outcome.scored)
        })
    }

    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings {
        Standings::X01(self.replay(ledger, order))
    }

    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId> {
        self.replay(ledger, order).winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn darts(notation: &[&str]) -> Vec<Dart> {
        notation.iter().map(|d| d.parse().unwrap()).collect()
    }

    #[test]
    fn test_overshoot_busts() {
        let engine = X01Engine::new(501, true);
        let outcome = engine.apply(&darts(&["T13", "S2"]), 40);
        assert!(outcome.bust);
        assert_eq!(outcome.remaining, 40);
    }

    #[test]
    fn test_leaving_one_busts_even_without_double_out() {
        let engine = X01Engine::new(501, false);
        let outcome = engine.apply(&darts(&["S19"]), 20);
        assert!(outcome.bust);
        assert_eq!(outcome.remaining, 20);
    }

    #[test]
    fn test_double_out_requires_double_finish() {
        let engine = X01Engine::new(501, true);
        let outcome = engine.apply(&darts(&["S2"]), 2);
        assert!(outcome.bust);

        let outcome = engine.apply(&darts(&["D1"]), 2);
        assert!(outcome.finished());
    }

    #[test]
    fn test_single_finish_allowed_without_double_out() {
        let engine = X01Engine::new(301, false);
        let outcome = engine.apply(&darts(&["S2"]), 2);
        assert!(outcome.finished());
    }

    #[test]
    fn test_170_checkout_on_bull() {
        let engine = X01Engine::new(501, true);
        let outcome = engine.apply(&darts(&["T20", "T20", "50"]), 170);
        assert_eq!(outcome.scored, 170);
        assert!(outcome.finished());
    }

    #[test]
    fn test_double_outer_bull_counts_as_double() {
        let engine = X01Engine::new(501, true);
        assert!(engine.apply(&darts(&["D25"]), 50).finished());
    }

    #[test]
    fn test_replay_tracks_remaining_and_busts() {
        use crate::engine::TurnScore;
        use chrono::Utc;

        let engine = X01Engine::new(101, true);
        let order = PlayerOrder::new(vec!["a".into(), "b".into()]);
        let mut ledger = TurnLedger::new();
        ledger.append("a".into(), darts(&["T20"]), TurnScore::points(60), Utc::now());
        ledger.append("b".into(), darts(&["T20", "T20"]), TurnScore::busted(), Utc::now());
        ledger.append("a".into(), darts(&["S1", "D20"]), TurnScore::points(41), Utc::now());

        let standings = engine.replay(&ledger, &order);
        assert_eq!(standings.remaining_for("a"), Some(0));
        assert_eq!(standings.remaining_for("b"), Some(101));
        assert_eq!(*standings.rows()[1].busts(), 1);
        assert_eq!(standings.winner().as_deref(), Some("a"));
    }
}
