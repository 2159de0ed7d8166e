//! Cricket: close 20 through 15 and Bull, scoring overflow on open targets.
//!
//! Marks and points accumulate non-linearly (overflow depends on throw
//! order and on opponents' marks), so standings are always rebuilt by
//! replaying the whole ordered ledger dart by dart. Nothing is cached.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{instrument, trace, warn};

use super::{GameKind, ScoringEngine, Standings, TurnScore};
use crate::dart::{BULL, Dart, OUTER_BULL};
use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};

/// Marks needed to close a target.
pub const MARKS_TO_CLOSE: u8 = 3;

/// A Cricket target. Bull unifies the outer (25) and inner (50) bull.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum CricketTarget {
    /// 20.
    #[strum(to_string = "20")]
    Twenty,
    /// 19.
    #[strum(to_string = "19")]
    Nineteen,
    /// 18.
    #[strum(to_string = "18")]
    Eighteen,
    /// 17.
    #[strum(to_string = "17")]
    Seventeen,
    /// 16.
    #[strum(to_string = "16")]
    Sixteen,
    /// 15.
    #[strum(to_string = "15")]
    Fifteen,
    /// Outer and inner bull.
    #[strum(to_string = "Bull")]
    Bull,
}

impl CricketTarget {
    /// Position of this target in a marks row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Target for a numbered segment 15-20.
    fn from_segment(segment: u8) -> Option<Self> {
        match segment {
            20 => Some(Self::Twenty),
            19 => Some(Self::Nineteen),
            18 => Some(Self::Eighteen),
            17 => Some(Self::Seventeen),
            16 => Some(Self::Sixteen),
            15 => Some(Self::Fifteen),
            _ => None,
        }
    }
}

/// What one dart contributes in Cricket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CricketHit {
    /// Target hit.
    pub target: CricketTarget,
    /// Marks added (1-3).
    pub marks: u8,
    /// Points per overflow mark.
    pub points_per_mark: u32,
}

impl CricketHit {
    /// Maps a dart to a Cricket hit; segments 1-14 and misses are non-targets.
    pub fn from_dart(dart: &Dart) -> Option<Self> {
        match dart.segment() {
            BULL => Some(Self {
                target: CricketTarget::Bull,
                marks: 2,
                points_per_mark: 25,
            }),
            OUTER_BULL => Some(Self {
                target: CricketTarget::Bull,
                marks: dart.multiplier().clamp(1, 2),
                points_per_mark: 25,
            }),
            segment => CricketTarget::from_segment(segment).map(|target| Self {
                target,
                marks: dart.multiplier().clamp(1, 3),
                points_per_mark: u32::from(segment),
            }),
        }
    }
}

/// One player's marks and points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CricketRow {
    /// Player.
    player: PlayerId,
    /// Marks per target, indexed by [`CricketTarget::index`], capped at 3.
    marks: [u8; 7],
    /// Overflow points.
    points: u32,
}

impl CricketRow {
    fn empty(player: PlayerId) -> Self {
        Self {
            player,
            marks: [0; 7],
            points: 0,
        }
    }

    /// Marks on a target.
    pub fn marks_on(&self, target: CricketTarget) -> u8 {
        self.marks[target.index()]
    }

    /// Whether every target is closed.
    pub fn closed_all(&self) -> bool {
        self.marks.iter().all(|&m| m >= MARKS_TO_CLOSE)
    }
}

/// Cricket standings in frozen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CricketStandings {
    /// One row per seat.
    rows: Vec<CricketRow>,
}

impl CricketStandings {
    /// Row for a player.
    pub fn row(&self, player: &str) -> Option<&CricketRow> {
        self.rows.iter().find(|r| r.player == player)
    }

    pub(crate) fn relabel(&mut self, label: &dyn Fn(&str) -> String) {
        for row in &mut self.rows {
            row.player = label(&row.player);
        }
    }

    /// Whether some player other than `seat` still has `target` open.
    fn open_for_opponent(&self, seat: usize, target: CricketTarget) -> bool {
        self.rows
            .iter()
            .enumerate()
            .any(|(i, r)| i != seat && r.marks_on(target) < MARKS_TO_CLOSE)
    }

    /// Applies darts for the player at `seat`, returning points scored.
    ///
    /// Opponent openness is read from the rows as they stood before this
    /// turn; only the thrower's own row changes while darts are applied.
    fn apply(&mut self, seat: usize, darts: &[Dart]) -> u32 {
        let mut scored = 0;
        for hit in darts.iter().filter_map(CricketHit::from_dart) {
            let idx = hit.target.index();
            let prior = self.rows[seat].marks[idx];
            let overflow = (prior + hit.marks).saturating_sub(MARKS_TO_CLOSE);

            if overflow > 0 && self.open_for_opponent(seat, hit.target) {
                scored += u32::from(overflow) * hit.points_per_mark;
            }
            self.rows[seat].marks[idx] = (prior + hit.marks).min(MARKS_TO_CLOSE);
            trace!(cricket_target = %hit.target, prior, overflow, "Cricket hit");
        }
        self.rows[seat].points += scored;
        scored
    }

    /// First player in frozen order who has closed everything and trails nobody.
    pub fn leader_with_all_closed(&self) -> Option<&PlayerId> {
        self.rows
            .iter()
            .find(|row| {
                row.closed_all() && self.rows.iter().all(|other| other.points <= row.points)
            })
            .map(|row| &row.player)
    }
}

impl std::fmt::Display for CricketStandings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<20}", "")?;
        for target in CricketTarget::iter() {
            write!(f, " {:>4}", target.to_string())?;
        }
        writeln!(f, " {:>5}", "Pts")?;
        for row in &self.rows {
            write!(f, "{:<20}", row.player)?;
            for marks in row.marks {
                let glyph = match marks {
                    0 => "-",
                    1 => "/",
                    2 => "X",
                    _ => "(X)",
                };
                write!(f, " {glyph:>4}")?;
            }
            writeln!(f, " {:>5}", row.points)?;
        }
        Ok(())
    }
}

/// Cricket rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CricketEngine;

impl CricketEngine {
    /// Rebuilds marks and points by replaying every turn in order.
    #[instrument(skip_all, fields(turns = ledger.len()))]
    pub fn replay(&self, ledger: &TurnLedger, order: &PlayerOrder) -> CricketStandings {
        let mut standings = CricketStandings {
            rows: order.iter().cloned().map(CricketRow::empty).collect(),
        };
        for turn in ledger.ordered() {
            match order.seat_of(turn.player()) {
                Some(seat) => {
                    standings.apply(seat, turn.darts());
                }
                None => warn!(player = %turn.player(), "Turn by unseated player ignored"),
            }
        }
        standings
    }
}

impl ScoringEngine for CricketEngine {
    fn kind(&self) -> GameKind {
        GameKind::Cricket
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
        let seat = order
            .seat_of(player)
            .ok_or_else(|| ScoringError::UnknownPlayer(player.to_string()))?;
        let mut standings = self.replay(ledger, order);
        Ok(TurnScore::points(standings.apply(seat, darts)))
    }

    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings {
        Standings::Cricket(self.replay(ledger, order))
    }

    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId> {
        self.replay(ledger, order).leader_with_all_closed().cloned()
    }
}
