//! A single thrown dart.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use crate::error::ScoringError;

/// Segment recorded for a declared miss.
pub const MISS: u8 = 0;
/// Outer bull segment.
pub const OUTER_BULL: u8 = 25;
/// Inner bull sentinel; its value is a raw 50, not segment x multiplier.
pub const BULL: u8 = 50;

/// A thrown dart: target segment plus multiplier.
///
/// Segments are 1-20, 25 (outer bull, single or double), 50 (inner bull
/// sentinel, multiplier 1), or 0 for a declared miss (multiplier 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDart")]
pub struct Dart {
    segment: u8,
    multiplier: u8,
}

/// Stored form of a dart, validated on the way in.
#[derive(Deserialize)]
struct RawDart {
    segment: u8,
    multiplier: u8,
}

impl TryFrom<RawDart> for Dart {
    type Error = ScoringError;

    fn try_from(raw: RawDart) -> Result<Self, Self::Error> {
        Self::new(raw.segment, raw.multiplier)
    }
}

impl Dart {
    /// Creates a dart, rejecting combinations that don't exist on a board.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidDart`] for an impossible segment/multiplier pair.
    #[instrument]
    pub fn new(segment: u8, multiplier: u8) -> Result<Self, ScoringError> {
        let valid = match segment {
            MISS => multiplier == 0,
            1..=20 => (1..=3).contains(&multiplier),
            OUTER_BULL => (1..=2).contains(&multiplier),
            BULL => multiplier == 1,
            _ => false,
        };
        if valid {
            Ok(Self {
                segment,
                multiplier,
            })
        } else {
            Err(ScoringError::InvalidDart {
                segment,
                multiplier,
            })
        }
    }

    /// Single of a number.
    pub fn single(segment: u8) -> Result<Self, ScoringError> {
        Self::new(segment, 1)
    }

    /// Double of a number (or outer bull).
    pub fn double(segment: u8) -> Result<Self, ScoringError> {
        Self::new(segment, 2)
    }

    /// Treble of a number.
    pub fn treble(segment: u8) -> Result<Self, ScoringError> {
        Self::new(segment, 3)
    }

    /// Single outer bull (25).
    pub fn outer_bull() -> Self {
        Self {
            segment: OUTER_BULL,
            multiplier: 1,
        }
    }

    /// Inner bull (50).
    pub fn bull() -> Self {
        Self {
            segment: BULL,
            multiplier: 1,
        }
    }

    /// Declared miss.
    pub fn miss() -> Self {
        Self {
            segment: MISS,
            multiplier: 0,
        }
    }

    /// Segment hit.
    pub fn segment(&self) -> u8 {
        self.segment
    }

    /// Multiplier (0 for a miss).
    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    /// Raw points for this dart.
    pub fn value(&self) -> u32 {
        if self.segment == BULL {
            50
        } else {
            u32::from(self.segment) * u32::from(self.multiplier)
        }
    }

    /// Whether the dart counts as a double for double-out.
    pub fn is_double(&self) -> bool {
        self.multiplier == 2 || self.segment == BULL
    }

    /// Whether the dart is a declared miss.
    pub fn is_miss(&self) -> bool {
        self.segment == MISS
    }

    /// Builds a dart without validation, for exercising downstream checks.
    #[cfg(test)]
    pub(crate) fn unchecked(segment: u8, multiplier: u8) -> Self {
        Self {
            segment,
            multiplier,
        }
    }
}

impl std::fmt::Display for Dart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.segment, self.multiplier) {
            (MISS, _) => write!(f, "M"),
            (BULL, _) => write!(f, "50"),
            (OUTER_BULL, 2) => write!(f, "D25"),
            (OUTER_BULL, _) => write!(f, "25"),
            (s, 3) => write!(f, "T{s}"),
            (s, 2) => write!(f, "D{s}"),
            (s, _) => write!(f, "S{s}"),
        }
    }
}

impl FromStr for Dart {
    type Err = ScoringError;

    /// Reads `S20`/`20`, `D16`, `T19`, `25`, `D25`, `50`/`BULL`, `M`/`MISS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_uppercase();
        let unparsable = || ScoringError::UnparsableDart(s.to_string());

        match text.as_str() {
            "M" | "MISS" => return Ok(Self::miss()),
            "BULL" | "DB" => return Ok(Self::bull()),
            _ => {}
        }

        let (multiplier, digits) = match text.chars().next() {
            Some('S') => (1, &text[1..]),
            Some('D') => (2, &text[1..]),
            Some('T') => (3, &text[1..]),
            Some(c) if c.is_ascii_digit() => (1, text.as_str()),
            _ => return Err(unparsable()),
        };
        let segment: u8 = digits.parse().map_err(|_| unparsable())?;
        Self::new(segment, multiplier)
    }
}
