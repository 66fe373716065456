//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Nothing here keeps state, so the search
//! can call them as often as it likes.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WIN_LINES, check_winner};

use crate::{Board, Mark, Outcome};
use tracing::instrument;

/// Evaluates a board: a completed line wins, a full board draws.
#[instrument(level = "trace", skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    match check_winner(board) {
        Some(Mark::Player) => Outcome::PlayerWins,
        Some(Mark::Computer) => Outcome::ComputerWins,
        None if is_full(board) => Outcome::Draw,
        None => Outcome::InProgress,
    }
}
