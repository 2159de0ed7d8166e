//! Scoring errors surfaced to callers.
//!
//! Every failure is a discriminated value returned synchronously. A bust in
//! X01 is not an error; it is a recorded turn outcome.

use crate::player::PlayerId;

/// Error that can occur when validating, scoring, or undoing a turn.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ScoringError {
    /// A turn must carry between one and three darts.
    #[display("A turn takes 1 to 3 darts, got {}", _0)]
    InvalidDartCount(usize),

    /// The segment/multiplier pair does not exist on a board.
    #[display("No such dart: segment {} with multiplier {}", segment, multiplier)]
    InvalidDart {
        /// Segment that was thrown.
        segment: u8,
        /// Multiplier that was thrown.
        multiplier: u8,
    },

    /// Dart notation could not be read.
    #[display("Cannot read dart notation '{}'", _0)]
    UnparsableDart(String),

    /// The turn was submitted out of rotation.
    #[display("It's {}'s turn, not {}'s", expected, got)]
    NotActivePlayer {
        /// Player whose turn it is.
        expected: PlayerId,
        /// Player who submitted.
        got: PlayerId,
    },

    /// Player is not part of the match roster.
    #[display("Player {} is not in this match", _0)]
    UnknownPlayer(PlayerId),

    /// The leg already has a winner.
    #[display("Leg is already over")]
    LegAlreadyOver,

    /// Undo was requested with no turns recorded.
    #[display("No turns to undo")]
    EmptyLedger,

    /// The X01 starting score cannot be checked out.
    #[display("Starting score {} is too low to play", _0)]
    InvalidStartingScore(u32),

    /// Rotation or scoring was asked for with no players.
    #[display("Match has no players")]
    EmptyRoster,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for ScoringError {}
