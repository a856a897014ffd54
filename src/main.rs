use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use qada::cli::args::{Cli, Commands};
use qada::cli::handlers;
use qada::config::AppConfig;
use qada::db::migrations::run_migrations;
use qada::db::SqliteStore;
use qada::engine::{Clock, Session, SystemClock};
use qada::models::QadaProfile;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    let store = SqliteStore::new(&conn);
    let clock = SystemClock;
    let mut session = Session::load(&store, config.estimator.policy())?;
    session.tick(clock.today());

    let mutated = match cli.command {
        None | Some(Commands::Status) => {
            handlers::handle_status(&conn, &session, &config, &clock)?;
            false
        }
        Some(Commands::Setup {
            current_age,
            puberty_age,
            regularity,
            safety_margin,
            female,
            reset,
        }) => {
            let profile = QadaProfile {
                current_age,
                puberty_age,
                regularity_percent: regularity,
                safety_margin_enabled: safety_margin,
                is_female: female,
            };
            handlers::handle_setup(&conn, &mut session, &clock, profile, reset)?;
            true
        }
        Some(Commands::Mark { prayer }) => {
            handlers::handle_mark(&mut session, &prayer)?;
            true
        }
        Some(Commands::Qada { action }) => {
            handlers::handle_qada(&mut session, &action)?;
            true
        }
        Some(Commands::Fast { action }) => {
            handlers::handle_fast(&mut session, &clock, &action)?;
            true
        }
        Some(Commands::Project { rate, fasting_rate }) => {
            handlers::handle_project(&session, &config, &clock, rate, fasting_rate)?;
            false
        }
        Some(Commands::Progress { action }) => {
            handlers::handle_progress(&conn, &mut session, &action)?;
            true
        }
        Some(Commands::Export) => {
            handlers::handle_export(&session)?;
            false
        }
    };

    if mutated {
        handlers::announce(&conn, &mut session)?;
    }
    // The day rollover from `tick` is persisted even on read-only commands.
    session.save(&store)?;
    Ok(())
}
