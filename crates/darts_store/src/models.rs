//! Database models and their conversions to rules types.

use chrono::NaiveDateTime;
use darts_rules::{Dart, GameKind, MatchConfig, Player, Turn};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::error::DbError;
use crate::schema;

/// Player database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct PlayerRow {
    id: String,
    name: String,
    created_at: NaiveDateTime,
}

impl PlayerRow {
    /// Converts into a rules player.
    pub fn into_player(self) -> Player {
        Player::with_id(self.id, self.name)
    }
}

/// Insertable player model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::players)]
pub struct NewPlayerRow {
    id: String,
    name: String,
    created_at: NaiveDateTime,
}

/// Match database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
pub struct MatchRow {
    id: String,
    game_kind: String,
    starting_score: Option<i32>,
    double_out: bool,
    created_at: NaiveDateTime,
}

impl MatchRow {
    /// Parses the stored rules configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored game kind is unknown.
    #[instrument(skip(self), fields(match_id = %self.id, game_kind = %self.game_kind))]
    pub fn config(&self) -> Result<MatchConfig, DbError> {
        let kind: GameKind = self
            .game_kind
            .parse()
            .map_err(|e| DbError::new(format!("Invalid game kind '{}': {}", self.game_kind, e)))?;
        let starting_score = self
            .starting_score
            .map(u32::try_from)
            .transpose()
            .map_err(|e| DbError::new(format!("Invalid starting score: {}", e)))?;
        let config = MatchConfig::new(kind).with_double_out(self.double_out);
        Ok(match starting_score {
            Some(score) => config.with_starting_score(Some(score)),
            None => config,
        })
    }
}

/// Insertable match model.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::matches)]
pub struct NewMatchRow {
    id: String,
    game_kind: String,
    starting_score: Option<i32>,
    double_out: bool,
    created_at: NaiveDateTime,
}

impl NewMatchRow {
    /// Builds the row for a new match.
    pub fn from_config(id: String, config: &MatchConfig, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            game_kind: config.kind().to_string(),
            starting_score: config.starting_score().map(|s| s as i32),
            double_out: *config.double_out(),
            created_at,
        }
    }
}

/// One seat of a match's frozen order.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters, new)]
#[diesel(table_name = schema::match_players)]
pub struct SeatRow {
    match_id: String,
    seat: i32,
    player_id: String,
}

/// Leg database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::legs)]
pub struct LegRow {
    id: String,
    match_id: String,
    winner_id: Option<String>,
    created_at: NaiveDateTime,
}

/// Insertable leg model.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::legs)]
pub struct NewLegRow {
    id: String,
    match_id: String,
    created_at: NaiveDateTime,
}

/// Turn database model; darts are stored as a JSON array.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::turns)]
pub struct TurnRow {
    leg_id: String,
    sequence: i32,
    recorded_at: NaiveDateTime,
    player_id: String,
    darts: String,
    total: i32,
    bust: bool,
    inning: Option<i32>,
}

impl TurnRow {
    /// Builds the row for a recorded turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the darts cannot be serialized.
    #[instrument(skip(turn), fields(sequence = turn.sequence()))]
    pub fn from_turn(leg_id: &str, turn: &Turn) -> Result<Self, DbError> {
        Ok(Self {
            leg_id: leg_id.to_string(),
            sequence: *turn.sequence() as i32,
            recorded_at: turn.recorded_at().naive_utc(),
            player_id: turn.player().clone(),
            darts: serde_json::to_string(turn.darts())?,
            total: *turn.total() as i32,
            bust: *turn.bust(),
            inning: turn.inning().map(i32::from),
        })
    }

    /// Converts back into a rules turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored darts or numbers are malformed.
    #[instrument(skip(self), fields(leg_id = %self.leg_id, sequence = self.sequence))]
    pub fn into_turn(self) -> Result<Turn, DbError> {
        let darts: Vec<Dart> = serde_json::from_str(&self.darts)?;
        let sequence = u32::try_from(self.sequence)
            .map_err(|e| DbError::new(format!("Invalid sequence {}: {}", self.sequence, e)))?;
        let total = u32::try_from(self.total)
            .map_err(|e| DbError::new(format!("Invalid total {}: {}", self.total, e)))?;
        let inning = self
            .inning
            .map(u8::try_from)
            .transpose()
            .map_err(|e| DbError::new(format!("Invalid inning: {}", e)))?;
        Ok(Turn::new(
            sequence,
            self.recorded_at.and_utc(),
            self.player_id,
            darts,
            total,
            self.bust,
            inning,
        ))
    }
}
