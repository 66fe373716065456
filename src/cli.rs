//! Command-line interface for whisker_games.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Whisker Games - tic-tac-toe against a cat that sometimes slips
#[derive(Parser, Debug)]
#[command(name = "whisker_games")]
#[command(about = "Play tic-tac-toe against a beatable engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the REST game server
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
    },

    /// Play in the terminal
    Play {
        /// Chance in [0, 1] that the computer plays a weaker move (overrides config)
        #[arg(long)]
        mistake_chance: Option<f64>,

        /// Delay before the computer replies, in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Score every move on a board and show the policy's pick
    Solve {
        /// Nine squares of X, O and '.', row by row (e.g. "XX.OO....")
        #[arg(long)]
        board: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_flags() {
        let cli = Cli::try_parse_from(["whisker_games", "play", "--mistake-chance", "0.5"]).unwrap();
        match cli.command {
            Command::Play { mistake_chance, delay_ms } => {
                assert_eq!(mistake_chance, Some(0.5));
                assert_eq!(delay_ms, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["whisker_games", "serve", "--config", "game.toml", "-p", "8080"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("game.toml")));
        assert!(matches!(cli.command, Command::Serve { port: Some(8080), host: None }));
    }
}
