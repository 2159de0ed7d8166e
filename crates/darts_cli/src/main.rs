//! Darts - command-line scorer
//!
//! Drives the darts rules over a SQLite store: manage players, start
//! matches, record and undo turns, and show standings.

#![warn(missing_docs)]

mod cli;
mod config;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::{Cli, Command, PlayerAction};
use config::{DB_ENV_VAR, DartsConfig};
use darts_rules::{Dart, Match, MatchConfig, MatchService, Player, RecordStore, Standings};
use darts_store::SqliteStore;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DartsConfig::resolve(&cli.config, std::env::var(DB_ENV_VAR).ok(), cli.db)?;
    let store = SqliteStore::open(config.db_path().clone())?;

    match cli.command {
        Command::Player {
            action: PlayerAction::Add { name },
        } => add_player(&store, name),
        Command::Player {
            action: PlayerAction::List,
        } => list_players(&store),
        Command::New {
            game,
            players,
            no_double_out,
        } => new_match(&store, &game, &players, no_double_out),
        Command::Throw {
            match_id,
            player,
            darts,
        } => throw(store, &match_id, &player, &darts),
        Command::Undo { match_id } => undo(store, &match_id),
        Command::Show { match_id } => show(store, &match_id),
    }
}

/// Add a player to the roster
#[instrument(skip(store))]
fn add_player(store: &SqliteStore, name: String) -> Result<()> {
    let player = store.create_player(name)?;
    println!("Added {} ({})", player.name(), player.id());
    Ok(())
}

/// List the roster
#[instrument(skip(store))]
fn list_players(store: &SqliteStore) -> Result<()> {
    let players = store.list_players()?;
    if players.is_empty() {
        println!("No players yet. Add one with `darts player add <name>`.");
    }
    for player in players {
        println!("{}", player.name());
    }
    Ok(())
}

/// Start a match with named players in throwing order
#[instrument(skip(store))]
fn new_match(store: &SqliteStore, game: &str, names: &[String], no_double_out: bool) -> Result<()> {
    let config = MatchConfig::preset(game)
        .ok_or_else(|| {
            anyhow!("Unknown game '{game}'. Try 301, 501, cricket, baseball, or around-the-world")
        })?
        .with_double_out(!no_double_out);

    let mut roster: Vec<Player> = Vec::with_capacity(names.len());
    for name in names {
        let player = store
            .get_player_by_name(name)?
            .with_context(|| format!("No player named '{name}'. Add them with `darts player add`"))?;
        if roster.contains(&player) {
            bail!("{name} is listed twice");
        }
        roster.push(player);
    }

    let (match_id, leg_id) = store.create_match(&config, &roster)?;
    info!(match_id = %match_id, leg_id = %leg_id, "Match started");
    println!("{} match {match_id}", config.display_name());
    println!("{} to throw", roster[0].name());
    Ok(())
}

/// Record a turn
#[instrument(skip(store))]
fn throw(store: SqliteStore, match_id: &str, name: &str, notation: &[String]) -> Result<()> {
    let player = store
        .get_player_by_name(name)?
        .with_context(|| format!("No player named '{name}'"))?;
    let darts = notation
        .iter()
        .map(|d| d.parse::<Dart>())
        .collect::<Result<Vec<_>, _>>()?;
    let leg_id = store.latest_leg(match_id)?;
    let game = store.load_match(match_id)?.into_match();

    let mut service = MatchService::new(store);
    let report = service.submit_turn(match_id, &leg_id, player.id(), darts)?;
    debug!(sequence = report.turn().sequence(), "Turn submitted");

    let thrown: Vec<String> = report.turn().darts().iter().map(Dart::to_string).collect();
    if *report.turn().bust() {
        println!("{}: {} BUST", player.name(), thrown.join(" "));
    } else {
        println!("{}: {} ({})", player.name(), thrown.join(" "), report.turn().total());
    }
    print_standings(&game, report.standings().clone());

    match report.winner() {
        Some(winner) => println!("{} wins the leg!", name_of(&game, winner)),
        None => {
            let next = service.active_player(match_id, &leg_id)?;
            println!("{} to throw", next.name());
        }
    }
    Ok(())
}

/// Remove the last turn
#[instrument(skip(store))]
fn undo(store: SqliteStore, match_id: &str) -> Result<()> {
    let leg_id = store.latest_leg(match_id)?;
    let game = store.load_match(match_id)?.into_match();

    let mut service = MatchService::new(store);
    let report = service.undo_last(match_id, &leg_id)?;
    let removed = report.removed();
    println!(
        "Removed turn {} by {}",
        removed.sequence() + 1,
        name_of(&game, removed.player())
    );
    print_standings(&game, report.standings().clone());

    let next = service.active_player(match_id, &leg_id)?;
    println!("{} to throw", next.name());
    Ok(())
}

/// Show standings and whose turn it is
#[instrument(skip(store))]
fn show(store: SqliteStore, match_id: &str) -> Result<()> {
    let leg_id = store.latest_leg(match_id)?;
    let game = store.load_match(match_id)?.into_match();

    let mut service = MatchService::new(store);
    let standings = service.standings(match_id, &leg_id)?;
    println!("{}", game.config().display_name());
    print_standings(&game, standings);

    match service.store().load_leg(&leg_id)?.winner() {
        Some(winner) => println!("{} won the leg", name_of(&game, winner)),
        None => {
            let next = service.active_player(match_id, &leg_id)?;
            println!("{} to throw", next.name());
        }
    }
    Ok(())
}

fn name_of(game: &Match, id: &str) -> String {
    game.player(id)
        .map(|p| p.name().clone())
        .unwrap_or_else(|| id.to_string())
}

fn print_standings(game: &Match, standings: Standings) {
    print!("{}", standings.relabeled(|id| name_of(game, id)));
}
