//! Baseball: nine innings, each hit scores its multiplier.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{GameKind, ScoringEngine, Standings, TurnScore};
use crate::dart::Dart;
use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};
use crate::rotation::active_seat;

/// Innings in a game.
pub const INNINGS: u8 = 9;

/// One player's line in the box score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BoxScoreRow {
    /// Player.
    player: PlayerId,
    /// Runs per inning, index 0 = inning 1.
    innings: [u32; INNINGS as usize],
    /// Sum over all innings.
    total: u32,
}

/// Baseball standings in frozen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct BaseballStandings {
    /// One row per seat.
    rows: Vec<BoxScoreRow>,
    /// Inning now being played (1-9).
    current_inning: u8,
    /// Whether all nine innings have been played.
    complete: bool,
}

impl BaseballStandings {
    /// Row for a player.
    pub fn row(&self, player: &str) -> Option<&BoxScoreRow> {
        self.rows.iter().find(|r| r.player == player)
    }

    pub(crate) fn relabel(&mut self, label: &dyn Fn(&str) -> String) {
        for row in &mut self.rows {
            row.player = label(&row.player);
        }
    }

    /// Strictly highest total; ties go to the first tied player in frozen order.
    pub fn leader(&self) -> Option<&PlayerId> {
        let mut best: Option<&BoxScoreRow> = None;
        for row in &self.rows {
            if best.is_none_or(|b| row.total > b.total) {
                best = Some(row);
            }
        }
        best.map(|r| &r.player)
    }
}

impl std::fmt::Display for BaseballStandings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<20}", "")?;
        for inning in 1..=INNINGS {
            write!(f, " {inning:>3}")?;
        }
        writeln!(f, " {:>4}", "T")?;
        for row in &self.rows {
            write!(f, "{:<20}", row.player)?;
            for runs in row.innings {
                write!(f, " {runs:>3}")?;
            }
            writeln!(f, " {:>4}", row.total)?;
        }
        Ok(())
    }
}

/// Baseball rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseballEngine;

impl BaseballEngine {
    /// Inning after `turns` recorded turns: advances once every seat has thrown.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyRoster`] when there are no seats.
    pub fn inning_for(turns: usize, seats: usize) -> Result<u8, ScoringError> {
        active_seat(turns, seats)?;
        let inning = 1 + turns / seats;
        Ok(inning.min(usize::from(INNINGS)) as u8)
    }

    /// Runs for a turn: the sum of multipliers (miss = 0). Segments don't score.
    pub fn runs(darts: &[Dart]) -> u32 {
        darts.iter().map(|d| u32::from(d.multiplier())).sum()
    }

    /// Whether the game has run its nine innings.
    pub fn is_complete(turns: usize, seats: usize) -> bool {
        seats > 0 && turns >= usize::from(INNINGS) * seats
    }

    /// Rebuilds the box score from the ordered ledger.
    ///
    /// Each turn lands in the inning recorded on it; a turn without one falls
    /// back to the inning its sequence implies.
    #[instrument(skip_all, fields(turns = ledger.len()))]
    pub fn replay(&self, ledger: &TurnLedger, order: &PlayerOrder) -> BaseballStandings {
        let mut rows: Vec<BoxScoreRow> = order
            .iter()
            .map(|id| BoxScoreRow {
                player: id.clone(),
                innings: [0; INNINGS as usize],
                total: 0,
            })
            .collect();

        for turn in ledger.ordered() {
            let Some(seat) = order.seat_of(turn.player()) else {
                warn!(player = %turn.player(), "Turn by unseated player ignored");
                continue;
            };
            let inning = turn.inning().unwrap_or_else(|| {
                Self::inning_for(*turn.sequence() as usize, order.len()).unwrap_or(1)
            });
            if !(1..=INNINGS).contains(&inning) {
                warn!(inning, sequence = turn.sequence(), "Turn outside innings 1-9 ignored");
                continue;
            }
            let runs = Self::runs(turn.darts());
            rows[seat].innings[usize::from(inning - 1)] += runs;
            rows[seat].total += runs;
        }

        BaseballStandings {
            rows,
            current_inning: Self::inning_for(ledger.len(), order.len()).unwrap_or(1),
            complete: Self::is_complete(ledger.len(), order.len()),
        }
    }
}

impl ScoringEngine for BaseballEngine {
    fn kind(&self) -> GameKind {
        GameKind::Baseball
    }

    fn score(
        &self,
        ledger: &TurnLedger,
        order: &PlayerOrder,
        _player: &str,
        darts: &[Dart],
    ) -> Result<TurnScore, ScoringError> {
        let inning = Self::inning_for(ledger.len(), order.len())?;
        Ok(TurnScore::in_inning(Self::runs(darts), inning))
    }

    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings {
        Standings::Baseball(self.replay(ledger, order))
    }

    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId> {
        if !Self::is_complete(ledger.len(), order.len()) {
            return None;
        }
        self.replay(ledger, order).leader().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inning_advances_after_every_seat_throws() {
        assert_eq!(BaseballEngine::inning_for(0, 2), Ok(1));
        assert_eq!(BaseballEngine::inning_for(1, 2), Ok(1));
        assert_eq!(BaseballEngine::inning_for(2, 2), Ok(2));
        assert_eq!(BaseballEngine::inning_for(17, 2), Ok(9));
        assert_eq!(BaseballEngine::inning_for(40, 2), Ok(9));
        assert_eq!(BaseballEngine::inning_for(3, 0), Err(ScoringError::EmptyRoster));
    }

    #[test]
    fn test_runs_ignore_segment() {
        let darts = [Dart::single(7).unwrap(), Dart::double(3).unwrap()];
        assert_eq!(BaseballEngine::runs(&darts), 3);
        assert_eq!(BaseballEngine::runs(&[Dart::miss()]), 0);
        assert_eq!(BaseballEngine::runs(&[Dart::treble(1).unwrap()]), 3);
    }

    #[test]
    fn test_complete_after_nine_rounds() {
        assert!(!BaseballEngine::is_complete(17, 2));
        assert!(BaseballEngine::is_complete(18, 2));
        assert!(!BaseballEngine::is_complete(0, 0));
    }
}
