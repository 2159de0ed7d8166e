//! SQLite record store for players, matches, legs, and turns.

use chrono::Utc;
use darts_rules::{
    LegId, LegRecord, MatchConfig, MatchId, MatchRecord, Player, PlayerOrder, RecordStore,
    StoreError, Turn,
};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::error::DbError;
use crate::models::{
    LegRow, MatchRow, NewLegRow, NewMatchRow, NewPlayerRow, PlayerRow, SeatRow, TurnRow,
};
use crate::schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite-backed record store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: String,
}

impl SqliteStore {
    /// Opens the database at the given path and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening SqliteStore");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        debug!(applied = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Creates a player with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is already taken or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_player(&self, name: String) -> Result<Player, DbError> {
        debug!(name = %name, "Creating player");
        let mut conn = self.connection()?;

        let player = Player::new(name);
        let row = NewPlayerRow::new(
            player.id().clone(),
            player.name().clone(),
            Utc::now().naive_utc(),
        );
        diesel::insert_into(schema::players::table)
            .values(&row)
            .execute(&mut conn)?;

        info!(player_id = %player.id(), name = %player.name(), "Player created");
        Ok(player)
    }

    /// Gets a player by name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player_by_name(&self, name: &str) -> Result<Option<Player>, DbError> {
        debug!(name = %name, "Looking up player by name");
        let mut conn = self.connection()?;

        let row = schema::players::table
            .filter(schema::players::name.eq(name))
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .optional()?;

        if row.is_none() {
            debug!("Player not found");
        }
        Ok(row.map(PlayerRow::into_player))
    }

    /// Lists all players, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_players(&self) -> Result<Vec<Player>, DbError> {
        debug!("Listing all players");
        let mut conn = self.connection()?;

        let rows = schema::players::table
            .order(schema::players::created_at.asc())
            .select(PlayerRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Players loaded");
        Ok(rows.into_iter().map(PlayerRow::into_player).collect())
    }

    /// Creates a match with its first leg, freezing the roster order given.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the configuration cannot be played or a
    /// database error occurs; nothing is written then.
    #[instrument(skip(self, roster), fields(kind = %config.kind(), players = roster.len()))]
    pub fn create_match(
        &self,
        config: &MatchConfig,
        roster: &[Player],
    ) -> Result<(MatchId, LegId), DbError> {
        config
            .validate()
            .map_err(|e| DbError::new(format!("Invalid match configuration: {}", e)))?;
        let mut conn = self.connection()?;
        let match_id = uuid::Uuid::new_v4().to_string();
        let leg_id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().naive_utc();

        let seats: Vec<SeatRow> = roster
            .iter()
            .enumerate()
            .map(|(seat, player)| SeatRow::new(match_id.clone(), seat as i32, player.id().clone()))
            .collect();

        conn.transaction::<_, DbError, _>(|conn| {
            diesel::insert_into(schema::matches::table)
                .values(&NewMatchRow::from_config(match_id.clone(), config, now))
                .execute(conn)?;
            diesel::insert_into(schema::match_players::table)
                .values(&seats)
                .execute(conn)?;
            diesel::insert_into(schema::legs::table)
                .values(&NewLegRow::new(leg_id.clone(), match_id.clone(), now))
                .execute(conn)?;
            Ok(())
        })?;

        info!(match_id = %match_id, leg_id = %leg_id, "Match created");
        Ok((match_id, leg_id))
    }

    /// Most recently created leg of a match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the match has no legs or a database error occurs.
    #[instrument(skip(self))]
    pub fn latest_leg(&self, match_id: &str) -> Result<LegId, DbError> {
        let mut conn = self.connection()?;
        schema::legs::table
            .filter(schema::legs::match_id.eq(match_id))
            .order(schema::legs::created_at.desc())
            .select(schema::legs::id)
            .first::<String>(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::new(format!("Match '{}' has no legs", match_id)))
    }

    #[instrument(skip(self))]
    fn fetch_match(&self, match_id: &str) -> Result<MatchRecord, DbError> {
        let mut conn = self.connection()?;

        let row = schema::matches::table
            .find(match_id)
            .select(MatchRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::new(format!("Match '{}' not found", match_id)))?;

        let seats: Vec<(SeatRow, Option<PlayerRow>)> = schema::match_players::table
            .left_join(schema::players::table)
            .filter(schema::match_players::match_id.eq(match_id))
            .order(schema::match_players::seat.asc())
            .select((SeatRow::as_select(), Option::<PlayerRow>::as_select()))
            .load(&mut conn)?;

        let order = PlayerOrder::new(seats.iter().map(|(s, _)| s.player_id().clone()).collect());
        let roster = seats
            .into_iter()
            .map(|(seat, player)| match player {
                Some(player) => player.into_player(),
                None => {
                    warn!(player_id = %seat.player_id(), "Seated player missing from roster");
                    Player::with_id(seat.player_id().clone(), seat.player_id().clone())
                }
            })
            .collect();

        debug!(seats = order.len(), "Match loaded");
        Ok(MatchRecord::new(row.id().clone(), row.config()?, roster, order))
    }

    #[instrument(skip(self))]
    fn fetch_leg(&self, leg_id: &str) -> Result<LegRecord, DbError> {
        let mut conn = self.connection()?;

        let leg = schema::legs::table
            .find(leg_id)
            .select(LegRow::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::new(format!("Leg '{}' not found", leg_id)))?;

        let turns = schema::turns::table
            .filter(schema::turns::leg_id.eq(leg_id))
            .order((schema::turns::sequence.asc(), schema::turns::recorded_at.asc()))
            .select(TurnRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(TurnRow::into_turn)
            .collect::<Result<Vec<Turn>, DbError>>()?;

        debug!(turns = turns.len(), "Leg loaded");
        Ok(LegRecord::new(
            leg.id().clone(),
            leg.match_id().clone(),
            turns,
            leg.winner_id().clone(),
        ))
    }

    #[instrument(skip(self, turn), fields(sequence = turn.sequence()))]
    fn insert_turn(&self, leg_id: &str, turn: &Turn) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        diesel::insert_into(schema::turns::table)
            .values(&TurnRow::from_turn(leg_id, turn)?)
            .execute(&mut conn)?;
        debug!("Turn stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_turn(&self, leg_id: &str, sequence: u32) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let deleted = diesel::delete(
            schema::turns::table
                .filter(schema::turns::leg_id.eq(leg_id))
                .filter(schema::turns::sequence.eq(sequence as i32)),
        )
        .execute(&mut conn)?;

        if deleted == 0 {
            warn!("No stored turn with that sequence");
            return Err(DbError::new(format!(
                "Leg '{}' has no turn {}",
                leg_id, sequence
            )));
        }
        debug!("Turn deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn update_winner(&self, leg_id: &str, winner: Option<&str>) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let updated = diesel::update(schema::legs::table.find(leg_id))
            .set(schema::legs::winner_id.eq(winner))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(DbError::new(format!("Leg '{}' not found", leg_id)));
        }
        debug!("Winner updated");
        Ok(())
    }
}

impl RecordStore for SqliteStore {
    fn load_match(&self, match_id: &str) -> Result<MatchRecord, StoreError> {
        Ok(self.fetch_match(match_id)?)
    }

    fn load_leg(&self, leg_id: &str) -> Result<LegRecord, StoreError> {
        Ok(self.fetch_leg(leg_id)?)
    }

    fn append_turn(&mut self, leg_id: &str, turn: &Turn) -> Result<(), StoreError> {
        Ok(self.insert_turn(leg_id, turn)?)
    }

    fn remove_turn(&mut self, leg_id: &str, sequence: u32) -> Result<(), StoreError> {
        Ok(self.delete_turn(leg_id, sequence)?)
    }

    fn set_winner(&mut self, leg_id: &str, winner: Option<&str>) -> Result<(), StoreError> {
        Ok(self.update_winner(leg_id, winner)?)
    }
}
