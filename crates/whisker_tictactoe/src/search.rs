//! Exhaustive minimax search with alpha-beta pruning.
//!
//! Scores are from the computer's point of view. A computer win at depth `d`
//! scores `10 - d` and a player win scores `d - 10`, so the search prefers
//! winning sooner and losing later. Boards are passed by value; each branch
//! works on its own copy.

use crate::rules::evaluate;
use crate::{Board, Mark, Outcome};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Score of a computer win found at depth zero.
pub const WIN_SCORE: i32 = 10;

/// A candidate move and its search score. Higher is better for the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoredMove {
    /// Board index (0-8).
    pub index: usize,
    /// Minimax value of playing here.
    pub score: i32,
}

/// Minimax value of `board`.
///
/// `maximizing` is true when the computer is to move. `alpha` and `beta` are
/// the usual bounds; pass `i32::MIN` and `i32::MAX` at the root.
pub fn score(board: Board, depth: i32, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
    match evaluate(&board) {
        Outcome::ComputerWins => return WIN_SCORE - depth,
        Outcome::PlayerWins => return depth - WIN_SCORE,
        Outcome::Draw => return 0,
        Outcome::InProgress => {}
    }

    if maximizing {
        let mut max_eval = i32::MIN;
        for index in board.legal_moves() {
            let eval = score(board.placed(index, Mark::Computer), depth + 1, false, alpha, beta);
            max_eval = max_eval.max(eval);
            alpha = alpha.max(eval);
            if beta <= alpha {
                break;
            }
        }
        max_eval
    } else {
        let mut min_eval = i32::MAX;
        for index in board.legal_moves() {
            let eval = score(board.placed(index, Mark::Player), depth + 1, true, alpha, beta);
            min_eval = min_eval.min(eval);
            beta = beta.min(eval);
            if beta <= alpha {
                break;
            }
        }
        min_eval
    }
}

/// Scores every legal computer move on `board`, in ascending index order.
///
/// Each candidate is searched with the player to reply at depth zero. An
/// empty result means the board is full.
#[instrument(skip(board), fields(board = %board))]
pub fn score_moves(board: &Board) -> Vec<ScoredMove> {
    let scored: Vec<ScoredMove> = board
        .legal_moves()
        .into_iter()
        .map(|index| ScoredMove {
            index,
            score: score(board.placed(index, Mark::Computer), 0, false, i32::MIN, i32::MAX),
        })
        .collect();
    trace!(?scored, "Scored candidate moves");
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_terminal_scores() {
        assert_eq!(score(parse("XX_OOOX__"), 0, false, i32::MIN, i32::MAX), 10);
        assert_eq!(score(parse("XX_OOOX__"), 3, true, i32::MIN, i32::MAX), 7);
        assert_eq!(score(parse("XXXOO____"), 2, true, i32::MIN, i32::MAX), -8);
        assert_eq!(score(parse("XOXOXXOXO"), 5, true, i32::MIN, i32::MAX), 0);
    }

    #[test]
    fn test_immediate_win_scores_ten() {
        let scored = score_moves(&parse("XX_OO____"));
        let win = scored.iter().find(|m| m.index == 5).unwrap();
        assert_eq!(win.score, 10);
        assert!(scored.iter().all(|m| m.score <= 10));
    }

    #[test]
    fn test_score_moves_in_index_order() {
        let board = parse("X___O____");
        let indices: Vec<usize> = score_moves(&board).iter().map(|m| m.index).collect();
        assert_eq!(indices, board.legal_moves());
    }

    #[test]
    fn test_full_board_has_no_moves() {
        assert!(score_moves(&parse("XOXOXXOXO")).is_empty());
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        assert_eq!(score(Board::new(), 0, true, i32::MIN, i32::MAX), 0);
    }

    #[test]
    fn test_score_is_idempotent_and_pure() {
        let board = parse("X___O___X");
        let before = board;
        let a = score(board, 0, true, i32::MIN, i32::MAX);
        let b = score(board, 0, true, i32::MIN, i32::MAX);
        assert_eq!(a, b);
        assert_eq!(board, before);
    }

    #[test]
    fn test_unblocked_threat_loses() {
        // Player threatens 6; every computer move except 6 lets X win next ply.
        let scored = score_moves(&parse("X__XO____"));
        for m in &scored {
            if m.index == 6 {
                assert!(m.score >= 0, "blocking should not lose: {m:?}");
            } else {
                assert!(m.score < 0, "non-block should lose: {m:?}");
            }
        }
    }
}
