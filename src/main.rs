//! Whisker Games - Unified CLI
//!
//! Tic-tac-toe against a beatable engine, served over REST or played in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use whisker_games::{Board, GameConfig, SessionManager, computer_to_move, reporter_for};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port, host } => run_server(config.with_address(host, port)).await,
        Command::Play {
            mistake_chance,
            delay_ms,
        } => {
            let config = match mistake_chance {
                Some(chance) => config.with_mistake_chance(chance)?,
                None => config,
            };
            let config = match delay_ms {
                Some(ms) => config.with_computer_delay_ms(ms),
                None => config,
            };
            run_terminal(config).await
        }
        Command::Solve { board } => run_solve(&config, &board),
    }
}

/// Run the REST game server
async fn run_server(config: GameConfig) -> Result<()> {
    info!(
        mistake_chance = *config.mistake_chance(),
        delay_ms = *config.computer_delay_ms(),
        reporting = config.report_url().is_some(),
        "Starting Whisker Games server"
    );
    let reporter = reporter_for(config.report_url().as_deref())?;
    let manager = SessionManager::new(config.policy(), config.computer_delay(), Arc::from(reporter));
    whisker_games::serve(config.host(), *config.port(), manager).await
}

/// Play against the engine on stdin/stdout
async fn run_terminal(config: GameConfig) -> Result<()> {
    let reporter = reporter_for(config.report_url().as_deref())?;
    whisker_games::play(&config, reporter.as_ref()).await
}

/// Print the scored moves for a board
fn run_solve(config: &GameConfig, board: &str) -> Result<()> {
    let board: Board = board.parse().context("Invalid board")?;
    if !computer_to_move(&board) {
        warn!("Board does not have O to move; scoring it anyway");
    }
    print!("{}", whisker_games::solve(&board, &config.policy())?);
    Ok(())
}
