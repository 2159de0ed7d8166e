//! Darts store - SQLite persistence for darts matches
//!
//! Implements [`darts_rules::RecordStore`] over a SQLite database managed by
//! diesel, with migrations embedded in the binary.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

// Crate-level exports via pub use
pub use error::DbError;
pub use models::{
    LegRow, MatchRow, NewLegRow, NewMatchRow, NewPlayerRow, PlayerRow, SeatRow, TurnRow,
};
pub use repository::SqliteStore;
