//! Darts rules - scoring core for darts matches
//!
//! Scores a leg of darts from an append-only turn ledger. Standings and
//! winners are always replayed from the ledger, so undo is exact.
//!
//! # Architecture
//!
//! - **Dart**: validated segment/multiplier pairs with text notation
//! - **Ledger**: ordered, undoable turn history plus rotation
//! - **Engines**: X01, Cricket, Baseball, and Around the World
//! - **Orchestrator**: validates, scores, and records turns for one leg
//! - **Service**: the same operations keyed by ids over a [`RecordStore`]
//!
//! # Example
//!
//! ```
//! use darts_rules::{Dart, Match, MatchConfig, Orchestrator, Player};
//!
//! let roster = vec![Player::new("Ann"), Player::new("Bob")];
//! let ann = roster[0].id().clone();
//! let mut leg = Orchestrator::new(Match::new("m1".into(), MatchConfig::x01(40), roster), "l1".into());
//!
//! let report = leg.submit_turn(&ann, vec!["D20".parse::<Dart>()?])?;
//! assert_eq!(report.winner().as_ref(), Some(&ann));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod contracts;
mod dart;
mod engine;
mod error;
mod invariants;
mod ledger;
mod orchestrator;
mod player;
mod rotation;
mod service;
mod store;

// Crate-level exports - Darts and players
pub use dart::{BULL, Dart, MISS, OUTER_BULL};
pub use player::{Player, PlayerId, PlayerOrder};

// Crate-level exports - Ledger and rotation
pub use ledger::{Turn, TurnLedger};
pub use rotation::{active_player, active_seat};

// Crate-level exports - Engines
pub use engine::{
    AroundTheWorldEngine, AroundTheWorldStandings, BaseballEngine, BaseballStandings, BoxScoreRow,
    CricketEngine, CricketHit, CricketRow, CricketStandings, CricketTarget, DEFAULT_STARTING_SCORE,
    Engine, GameKind, INNINGS, LAST_TARGET, MIN_STARTING_SCORE, MatchConfig, ScoringEngine,
    Standings, TargetProgress, TurnScore, X01Engine, X01Outcome, X01Row, X01Standings,
};

// Crate-level exports - Contracts and invariants
pub use contracts::{
    Contract, DartCountInRange, DartsOnBoard, LegInProgress, LegalTurn, MAX_DARTS_PER_TURN,
    PlayableConfig, PlayersTurn, RosterSeated, TurnContract, TurnSubmission,
};
pub use invariants::{
    ContiguousSequenceInvariant, Invariant, InvariantSet, InvariantViolation, LegInvariants,
    RemainingCacheInvariant, WinnerConsistentInvariant,
};

// Crate-level exports - Orchestration
pub use orchestrator::{Leg, LegId, Match, MatchId, Orchestrator, TurnReport, UndoReport};

// Crate-level exports - Persistence seam and service
pub use error::ScoringError;
pub use service::{MatchService, ServiceError};
pub use store::{LegRecord, MatchRecord, MemoryStore, RecordStore, StoreError};
