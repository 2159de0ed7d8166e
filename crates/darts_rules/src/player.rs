//! Players and the frozen turn order.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Unique identifier for a player.
pub type PlayerId = String;

/// A player known to the roster store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Stable unique id.
    id: PlayerId,
    /// Display name.
    name: String,
}

impl Player {
    /// Creates a player with a fresh id.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Rebuilds a player from stored fields.
    pub fn with_id(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Turn order captured once at match creation.
///
/// Rotation always indexes this list, never the roster's own iteration
/// order, so a store that reorders players cannot perturb whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerOrder(Vec<PlayerId>);

impl PlayerOrder {
    /// Freezes the given ids in order.
    pub fn new(ids: Vec<PlayerId>) -> Self {
        Self(ids)
    }

    /// Freezes the order of the given players.
    pub fn from_players(players: &[Player]) -> Self {
        Self(players.iter().map(|p| p.id.clone()).collect())
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no players are seated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Player id at a seat.
    pub fn get(&self, seat: usize) -> Option<&PlayerId> {
        self.0.get(seat)
    }

    /// Seat of a player, if seated.
    pub fn seat_of(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|p| p == id)
    }

    /// Iterates ids in turn order.
    pub fn iter(&self) -> std::slice::Iter<'_, PlayerId> {
        self.0.iter()
    }

    /// Ids in turn order.
    pub fn ids(&self) -> &[PlayerId] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a PlayerOrder {
    type Item = &'a PlayerId;
    type IntoIter = std::slice::Iter<'a, PlayerId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
