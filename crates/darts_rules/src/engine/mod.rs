//! Scoring engines for each game variant.
//!
//! Every engine is pure: standings and winners are replayed from the ordered
//! ledger on each call, so undo never leaves stale state behind. The variant
//! is picked once at match creation and wrapped in the closed [`Engine`] enum.

mod around_the_world;
mod baseball;
mod cricket;
mod x01;

pub use around_the_world::{AroundTheWorldEngine, AroundTheWorldStandings, LAST_TARGET, TargetProgress};
pub use baseball::{BaseballEngine, BaseballStandings, BoxScoreRow, INNINGS};
pub use cricket::{CricketEngine, CricketHit, CricketRow, CricketStandings, CricketTarget};
pub use x01::{X01Engine, X01Outcome, X01Row, X01Standings};

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::dart::Dart;
use crate::error::ScoringError;
use crate::ledger::TurnLedger;
use crate::player::{PlayerId, PlayerOrder};

/// Default X01 starting score when none is configured.
pub const DEFAULT_STARTING_SCORE: u32 = 501;

/// Lowest X01 starting score that can be checked out.
pub const MIN_STARTING_SCORE: u32 = 2;

/// Game variants supported by the rules engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameKind {
    /// 301/501 count-down.
    X01,
    /// Close 20-15 and Bull, scoring on overflow.
    Cricket,
    /// Nine innings of hits.
    Baseball,
    /// Hit 1 through 20 in order.
    AroundTheWorld,
}

/// Per-match rules configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct MatchConfig {
    /// Selected variant.
    kind: GameKind,
    /// X01 starting score.
    starting_score: Option<u32>,
    /// X01 double-out rule.
    double_out: bool,
}

impl MatchConfig {
    /// Configuration for a variant with default options.
    pub fn new(kind: GameKind) -> Self {
        Self {
            kind,
            starting_score: (kind == GameKind::X01).then_some(DEFAULT_STARTING_SCORE),
            double_out: true,
        }
    }

    /// X01 from the given starting score, double-out on.
    pub fn x01(starting_score: u32) -> Self {
        Self::new(GameKind::X01).with_starting_score(Some(starting_score))
    }

    /// Looks up a named preset: `301`, `501`, `cricket`, `baseball`,
    /// `around-the-world` (also `atw`).
    #[instrument]
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "301" => Some(Self::x01(301)),
            "501" => Some(Self::x01(501)),
            "x01" => Some(Self::new(GameKind::X01)),
            "cricket" => Some(Self::new(GameKind::Cricket)),
            "baseball" => Some(Self::new(GameKind::Baseball)),
            "around_the_world" | "atw" => Some(Self::new(GameKind::AroundTheWorld)),
            _ => None,
        }
    }

    /// Rejects an X01 start that cannot be played out: 0 is won by any
    /// dart and 1 always busts.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidStartingScore`] below [`MIN_STARTING_SCORE`].
    pub fn validate(&self) -> Result<(), ScoringError> {
        match self.starting_score {
            Some(score) if self.kind == GameKind::X01 && score < MIN_STARTING_SCORE => {
                Err(ScoringError::InvalidStartingScore(score))
            }
            _ => Ok(()),
        }
    }

    /// Human-readable name, e.g. "501" or "Cricket".
    pub fn display_name(&self) -> String {
        match self.kind {
            GameKind::X01 => self
                .starting_score
                .unwrap_or(DEFAULT_STARTING_SCORE)
                .to_string(),
            GameKind::Cricket => "Cricket".to_string(),
            GameKind::Baseball => "Baseball".to_string(),
            GameKind::AroundTheWorld => "Around the World".to_string(),
        }
    }
}

/// An engine's verdict on one candidate turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnScore {
    /// Engine-defined total for the turn.
    pub total: u32,
    /// X01 bust.
    pub bust: bool,
    /// Baseball inning the turn belongs to.
    pub inning: Option<u8>,
}

impl TurnScore {
    /// A plain scoring turn.
    pub fn points(total: u32) -> Self {
        Self {
            total,
            bust: false,
            inning: None,
        }
    }

    /// An X01 bust: recorded with zero.
    pub fn busted() -> Self {
        Self {
            total: 0,
            bust: true,
            inning: None,
        }
    }

    /// A Baseball turn tagged with its inning.
    pub fn in_inning(total: u32, inning: u8) -> Self {
        Self {
            total,
            bust: false,
            inning: Some(inning),
        }
    }
}

/// Derived per-player view, shaped per variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Standings {
    /// Remaining scores.
    X01(X01Standings),
    /// Marks and points.
    Cricket(CricketStandings),
    /// Box score by inning.
    Baseball(BaseballStandings),
    /// Next target per player.
    AroundTheWorld(AroundTheWorldStandings),
}

impl std::fmt::Display for Standings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Standings::X01(s) => write!(f, "{s}"),
            Standings::Cricket(s) => write!(f, "{s}"),
            Standings::Baseball(s) => write!(f, "{s}"),
            Standings::AroundTheWorld(s) => write!(f, "{s}"),
        }
    }
}

impl Standings {
    /// Replaces player ids with display labels such as roster names.
    pub fn relabeled(mut self, label: impl Fn(&str) -> String) -> Self {
        match &mut self {
            Standings::X01(s) => s.relabel(&label),
            Standings::Cricket(s) => s.relabel(&label),
            Standings::Baseball(s) => s.relabel(&label),
            Standings::AroundTheWorld(s) => s.relabel(&label),
        }
        self
    }
}

/// Common capability of every game variant.
pub trait ScoringEngine {
    /// Variant this engine scores.
    fn kind(&self) -> GameKind;

    /// Scores candidate darts for `player` against the current ledger.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::EmptyRoster`] when there are no players.
    fn score(
        &self,
        ledger: &TurnLedger,
        order: &PlayerOrder,
        player: &str,
        darts: &[Dart],
    ) -> Result<TurnScore, ScoringError>;

    /// Replays the ledger into standings.
    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings;

    /// Winner of the leg as the full ledger currently stands.
    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId>;
}

/// The engine selected for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// 301/501.
    X01(X01Engine),
    /// Cricket.
    Cricket(CricketEngine),
    /// Baseball.
    Baseball(BaseballEngine),
    /// Around the World.
    AroundTheWorld(AroundTheWorldEngine),
}

impl Engine {
    /// Builds the engine a configuration calls for.
    #[instrument]
    pub fn for_config(config: &MatchConfig) -> Self {
        match config.kind {
            GameKind::X01 => Engine::X01(X01Engine::new(
                config.starting_score.unwrap_or(DEFAULT_STARTING_SCORE),
                config.double_out,
            )),
            GameKind::Cricket => Engine::Cricket(CricketEngine),
            GameKind::Baseball => Engine::Baseball(BaseballEngine),
            GameKind::AroundTheWorld => Engine::AroundTheWorld(AroundTheWorldEngine),
        }
    }

    fn inner(&self) -> &dyn ScoringEngine {
        match self {
            Engine::X01(e) => e,
            Engine::Cricket(e) => e,
            Engine::Baseball(e) => e,
            Engine::AroundTheWorld(e) => e,
        }
    }
}

impl ScoringEngine for Engine {
    fn kind(&self) -> GameKind {
        self.inner().kind()
    }

    fn score(
        &self,
        ledger: &TurnLedger,
        order: &PlayerOrder,
        player: &str,
        darts: &[Dart],
    ) -> Result<TurnScore, ScoringError> {
        self.inner().score(ledger, order, player, darts)
    }

    fn standings(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Standings {
        self.inner().standings(ledger, order)
    }

    fn winner(&self, ledger: &TurnLedger, order: &PlayerOrder) -> Option<PlayerId> {
        self.inner().winner(ledger, order)
    }
}
