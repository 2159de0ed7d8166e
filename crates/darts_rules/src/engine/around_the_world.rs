//! Around the World: hit 1 through 20 in order.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use super::{GameKind, ScoringEngine, Standings, TurnScore};
use crate::dart::Dart;
use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};

/// Final number on the course; a player finishes once past it.
pub const LAST_TARGET: u8 = 20;

/// One player's position on the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TargetProgress {
    /// Player.
    player: PlayerId,
    /// Number to hit next (1-21; 21 means finished).
    next_target: u8,
}

impl TargetProgress {
    /// Whether the player has hit every number.
    pub fn finished(&self) -> bool {
        self.next_target > LAST_TARGET
    }
}

/// Around the World standings in frozen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct AroundTheWorldStandings {
    /// One row per seat.
    rows: Vec<TargetProgress>,
    /// First player, in ledger order, to get past the last target.
    winner: Option<PlayerId>,
}

impl AroundTheWorldStandings {
    /// Next target of a player.
    pub fn next_target_for(&self, player: &str) -> Option<u8> {
        self.rows
            .iter()
            .find(|r| r.player == player)
            .map(|r| r.next_target)
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

impl std::fmt::Display for AroundTheWorldStandings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            if row.finished() {
                writeln!(f, "{:<20} Done", row.player)?;
            } else {
                writeln!(f, "{:<20} Next {}", row.player, row.next_target)?;
            }
        }
        Ok(())
    }
}

/// Around the World rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AroundTheWorldEngine;

impl AroundTheWorldEngine {
    /// Walks darts in throw order from `next_target`, returning the new target.
    ///
    /// Only a hit on the pending number advances, one step per dart; any
    /// multiplier counts the same.
    pub fn advance(next_target: u8, darts: &[Dart]) -> u8 {
        let mut next = next_target;
        for dart in darts {
            if next > LAST_TARGET {
                break;
            }
            if dart.segment() == next {
                next += 1;
            }
        }
        next
    }

    /// Replays the ordered ledger into progress per player.
    #[instrument(skip_all, fields(turns = ledger.len()))]
    pub fn replay(&self, ledger: &TurnLedger, order: &PlayerOrder) -> AroundTheWorldStandings {
        let mut rows: Vec<TargetProgress> = order
            .iter()
            .map(|id| TargetProgress {
                player: id.clone(),
                next_target: 1,
            })
            .collect();
        let mut winner = None;

        for turn in ledger.ordered() {
            let Some(seat) = order.seat_of(turn.player()) else {
                warn!(player = %turn.player(), "Turn by unseated player ignored");
                continue;
            };
            let row = &mut rows[seat];
            if row.finished() {
                continue;
            }
            row.next_target = Self::advance(row.next_target, turn.darts());
            if row.finished() && winner.is_none() {
                winner = Some(row.player.clone());
            }
        }

        AroundTheWorldStandings { rows, winner }
    }
}

impl ScoringEngine for AroundTheWorldEngine {
    fn kind(&self) -> GameKind {
        GameKind::AroundTheWorld
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
        let from = self
            .replay(ledger, order)
            .next_target_for(player)
            .ok_or_else(|| ScoringError::UnknownPlayer(player.to_string()))?;
        let steps = Self::advance(from, darts) - from;
        Ok(TurnScore::points(u32::from(steps)))
    }

    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings {
        Standings::AroundTheWorld(self.replay(ledger, order))
    }

    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId> {
        self.replay(ledger, order).winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(segments: &[u8]) -> Vec<Dart> {
        segments.iter().map(|&s| Dart::single(s).unwrap()).collect()
    }

    #[test]
    fn test_consecutive_hits_advance_several_steps() {
        assert_eq!(AroundTheWorldEngine::advance(5, &singles(&[5, 6, 7])), 8);
    }

    #[test]
    fn test_out_of_order_hits_only_count_the_pending_number() {
        assert_eq!(AroundTheWorldEngine::advance(5, &singles(&[6, 5])), 6);
        assert_eq!(AroundTheWorldEngine::advance(4, &singles(&[6, 5])), 4);
    }

    #[test]
    fn test_repeat_hit_does_not_double_advance() {
        assert_eq!(AroundTheWorldEngine::advance(3, &singles(&[3, 3])), 4);
    }

    #[test]
    fn test_multiplier_counts_as_one_step() {
        let darts = [Dart::treble(9).unwrap()];
        assert_eq!(AroundTheWorldEngine::advance(9, &darts), 10);
    }

    #[test]
    fn test_finishing_stops_at_twenty_one() {
        let next = AroundTheWorldEngine::advance(19, &singles(&[19, 20, 1]));
        assert_eq!(next, LAST_TARGET + 1);
    }
}
