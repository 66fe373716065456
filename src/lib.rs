//! Whisker Games library - tic-tac-toe against a beatable engine
//!
//! The decision engine lives in [`whisker_tictactoe`]. This crate hosts it:
//!
//! - **Config**: TOML settings with environment overrides
//! - **Session**: match rooms with a scoreboard, for the REST server
//! - **Server**: REST API (axum)
//! - **Reporter**: forwards finished matches to a rewards service
//! - **Terminal**: interactive play on stdin/stdout
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use whisker_games::{GameConfig, LogReporter, SessionManager};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::load(None)?;
//! let manager = SessionManager::new(config.policy(), config.computer_delay(), Arc::new(LogReporter));
//! whisker_games::serve(config.host(), *config.port(), manager).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod mascot;
mod reporter;
mod server;
mod session;
mod terminal;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, MISTAKE_CHANCE_ENV, REPORT_URL_ENV};

// Crate-level exports - Result reporting
pub use reporter::{
    HttpReporter, LogReporter, ReportError, ReportReceipt, ResultPayload, ResultReporter,
    reporter_for, result_label,
};

// Crate-level exports - Mascot
pub use mascot::{CatLine, Mood, react};

// Crate-level exports - Server
pub use server::{ErrorBody, MoveRequest, router, serve};

// Crate-level exports - Session management
pub use session::{MatchRoom, RoomView, Scoreboard, SessionError, SessionId, SessionManager};

// Crate-level exports - Terminal play
pub use terminal::{Command as TerminalCommand, computer_to_move, parse_command, play, solve};

// Crate-level exports - Game types (tic-tac-toe)
pub use whisker_tictactoe::{
    Board, GameError, GameSession, Mark, MatchResult, MoveError, MovePolicy, NoLegalMoveError,
    Outcome, Placement, PlannedMove, Position, ScoredMove, SessionSnapshot, SessionState, Square,
};
