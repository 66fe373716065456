//! Play against the engine in the terminal.

use crate::config::GameConfig;
use crate::mascot;
use crate::reporter::ResultReporter;
use crate::session::Scoreboard;
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument, warn};
use whisker_tictactoe::{
    Board, GameSession, Mark, MatchResult, MovePolicy, Position, Square, policy::Decision,
};

/// What the player typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place a mark.
    Place(Position),
    /// Start a new match.
    Reset,
    /// Leave the game.
    Quit,
}

/// Parses a line of input: an index, a position label, `new` or `quit`.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Command::Quit),
        "n" | "new" | "reset" => Some(Command::Reset),
        other => Position::from_label_or_number(other).map(Command::Place),
    }
}

/// Runs the interactive loop on stdin/stdout until the player quits or input ends.
#[instrument(skip(config, reporter))]
pub async fn play(config: &GameConfig, reporter: &dyn ResultReporter) -> Result<()> {
    let policy = config.policy();
    let mut rng = SmallRng::from_rng(&mut rand::rng());
    let mut session = GameSession::new();
    let mut scoreboard = Scoreboard::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("You are X. Enter 0-8 or a position name, 'new' to restart, 'quit' to leave.");
    println!("{}\n", session.board().display());

    loop {
        if session.state().is_finished() {
            println!("Type 'new' to play again or 'quit' to leave.");
        } else {
            println!("Your move:");
        }

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            println!("Didn't catch that. Try a number from 0 to 8.");
            continue;
        };

        match command {
            Command::Quit => break,
            Command::Reset => {
                session.reset();
                println!("New match!\n{}\n", session.board().display());
            }
            Command::Place(position) => {
                let placement = match session.apply_player_move(position.to_index()) {
                    Ok(placement) => placement,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                println!("{}\n", session.board().display());
                if let Some(result) = placement.result {
                    finish(result, &mut scoreboard, reporter, &mut rng).await;
                    continue;
                }

                println!("The cat is thinking...");
                tokio::time::sleep(config.computer_delay()).await;
                let reply = session
                    .request_computer_move(&policy, &mut rng)
                    .context("Computer could not move")?;
                let label = Position::from_index(reply.index)
                    .map(|p| p.label())
                    .unwrap_or("?");
                println!(
                    "Computer plays {} ({}).\n{}\n",
                    reply.index,
                    label,
                    session.board().display()
                );
                if let Some(result) = reply.result {
                    finish(result, &mut scoreboard, reporter, &mut rng).await;
                }
            }
        }
    }

    println!(
        "Final score - you: {}, computer: {}, draws: {}",
        scoreboard.player(),
        scoreboard.computer(),
        scoreboard.draw()
    );
    Ok(())
}

async fn finish(
    result: MatchResult,
    scoreboard: &mut Scoreboard,
    reporter: &dyn ResultReporter,
    rng: &mut SmallRng,
) {
    scoreboard.record(result);
    println!("{}!", result);
    println!("{}", mascot::react(result, rng));
    match reporter.report(result).await {
        Ok(receipt) => {
            if let Some(code) = receipt.promo_code() {
                println!("Your promo code: {}", code);
            } else if *receipt.already_has_promo() {
                println!("You already received a promo code earlier.");
            }
        }
        Err(e) => warn!(error = %e, "Could not report result"),
    }
}

/// Scores every move on `board` and shows what the policy would pick.
#[instrument(skip(policy))]
pub fn solve(board: &Board, policy: &MovePolicy) -> Result<String> {
    let mut rng = SmallRng::from_rng(&mut rand::rng());
    let choice = policy
        .choose(board, &mut rng)
        .context("Board has no empty square")?;
    debug!(index = choice.index(), "Solved board");

    let mut out = format!("{}\n\n", board.display());
    for scored in choice.ranked() {
        out.push_str(&format!("  {}: {:>3}\n", scored.index, scored.score));
    }
    let why = match choice.decision() {
        Decision::Forced => "forced",
        Decision::Mistake => "deliberate mistake",
        Decision::Best => "best",
    };
    out.push_str(&format!("pick: {} ({})\n", choice.index(), why));
    Ok(out)
}

/// Counts marks so `solve` can warn about boards where `O` is not to move.
pub fn computer_to_move(board: &Board) -> bool {
    let count = |mark| board.squares().iter().filter(|s| **s == Square::Occupied(mark)).count();
    count(Mark::Player) == count(Mark::Computer) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("4"), Some(Command::Place(Position::Center)));
        assert_eq!(parse_command(" top-left "), Some(Command::Place(Position::TopLeft)));
        assert_eq!(parse_command("NEW"), Some(Command::Reset));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("42"), None);
    }

    #[test]
    fn test_solve_reports_forced_win() {
        let board: Board = "XX_OO_X__".parse().unwrap();
        let out = solve(&board, &MovePolicy::default()).unwrap();
        assert!(out.contains("pick: 5 (forced)"));
    }

    #[test]
    fn test_solve_full_board_fails() {
        let board: Board = "XOXOXXOXO".parse().unwrap();
        assert!(solve(&board, &MovePolicy::default()).is_err());
    }

    #[test]
    fn test_computer_to_move() {
        assert!(computer_to_move(&"X________".parse().unwrap()));
        assert!(!computer_to_move(&Board::new()));
    }
}
