//! Command-line interface for the darts scorer.

use clap::{Parser, Subcommand};

/// Darts - score X01, Cricket, Baseball, and Around the World legs
#[derive(Parser, Debug)]
#[command(name = "darts")]
#[command(about = "Score darts matches from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the database file (overrides darts.toml and DARTS_DB)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, default_value = "darts.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the player roster
    Player {
        /// Roster action
        #[command(subcommand)]
        action: PlayerAction,
    },

    /// Start a match and its first leg
    New {
        /// Game: 301, 501, cricket, baseball, around-the-world
        game: String,

        /// Player names in throwing order
        #[arg(required = true, num_args = 2..)]
        players: Vec<String>,

        /// Allow finishing X01 on any dart
        #[arg(long)]
        no_double_out: bool,
    },

    /// Record a turn for a player
    Throw {
        /// Match id
        match_id: String,

        /// Player name
        player: String,

        /// One to three darts, e.g. T20 D16 25 BULL M
        #[arg(required = true, num_args = 1..)]
        darts: Vec<String>,
    },

    /// Remove the last recorded turn
    Undo {
        /// Match id
        match_id: String,
    },

    /// Show standings and whose turn it is
    Show {
        /// Match id
        match_id: String,
    },
}

/// Roster actions
#[derive(Subcommand, Debug)]
pub enum PlayerAction {
    /// Add a player
    Add {
        /// Display name (must be unique)
        name: String,
    },

    /// List all players
    List,
}
