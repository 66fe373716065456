//! Move policy: turns search scores into a move that plays well, not perfectly.
//!
//! The branch order below is the product contract for perceived difficulty:
//!
//! 1. If the computer can win right now, or the player threatens to win on
//!    their next move, play a best move.
//! 2. Otherwise, with probability `mistake_chance` (and only with more than one
//!    legal move), play from the better part of the non-best moves.
//! 3. Otherwise play a best move.
//!
//! Ties are broken uniformly at random with the injected generator.

use crate::error::NoLegalMoveError;
use crate::rules::evaluate;
use crate::search::{ScoredMove, score_moves};
use crate::{Board, Mark, Outcome};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Default probability of a deliberate mistake.
pub const MISTAKE_CHANCE: f64 = 0.30;

/// Lowest score that only an immediate (depth 0 or 1) computer win can reach.
const IMMEDIATE_WIN_SCORE: i32 = 9;

/// Which rule picked the move. Reported in logs and by the `solve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The computer can win now or must block; no mistakes allowed.
    Forced,
    /// A deliberate non-best move.
    Mistake,
    /// A best move in the ordinary case.
    Best,
}

/// A chosen move together with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Choice {
    /// Board index (0-8).
    index: usize,
    /// Rule that produced the move.
    decision: Decision,
    /// Every candidate, sorted best first.
    ranked: Vec<ScoredMove>,
}

/// Chooses the computer's move with a tunable chance of erring.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
pub struct MovePolicy {
    /// Probability in `[0, 1]` of taking the mistake branch when it is allowed.
    mistake_chance: f64,
}

impl MovePolicy {
    /// Creates a policy. The chance is clamped into `[0, 1]`; NaN counts as zero.
    pub fn new(mistake_chance: f64) -> Self {
        let mistake_chance = if mistake_chance.is_nan() {
            0.0
        } else {
            mistake_chance.clamp(0.0, 1.0)
        };
        Self { mistake_chance }
    }

    /// A policy that never errs on purpose.
    pub fn perfect() -> Self {
        Self::new(0.0)
    }

    /// Chooses a board index for the computer.
    ///
    /// # Errors
    ///
    /// [`NoLegalMoveError`] if the board has no empty square.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        rng: &mut R,
    ) -> Result<usize, NoLegalMoveError> {
        self.choose(board, rng).map(|choice| choice.index)
    }

    /// Like [`MovePolicy::choose_move`], but keeps the ranking and the rule used.
    #[instrument(skip(self, board, rng), fields(board = %board, mistake_chance = self.mistake_chance))]
    pub fn choose<R: Rng + ?Sized>(
        &self,
        board: &Board,
        rng: &mut R,
    ) -> Result<Choice, NoLegalMoveError> {
        let mut ranked = score_moves(board);
        if ranked.is_empty() {
            return Err(NoLegalMoveError);
        }
        // Stable: equal scores keep ascending index order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let best_score = ranked[0].score;
        let best_moves: Vec<ScoredMove> = ranked
            .iter()
            .copied()
            .filter(|m| m.score == best_score)
            .collect();

        let can_win_now = best_score >= IMMEDIATE_WIN_SCORE;
        let player_can_win = player_can_win_next_turn(board);

        let (index, decision) = if can_win_now || player_can_win {
            (pick(&best_moves, rng), Decision::Forced)
        } else if rng.random::<f64>() < self.mistake_chance && ranked.len() > 1 {
            let worse: Vec<ScoredMove> = ranked
                .iter()
                .copied()
                .filter(|m| m.score < best_score)
                .collect();
            if worse.is_empty() {
                (pick(&best_moves, rng), Decision::Best)
            } else {
                let keep = worse.len() / 2 + 1;
                (pick(&worse[..keep], rng), Decision::Mistake)
            }
        } else {
            (pick(&best_moves, rng), Decision::Best)
        };

        debug!(
            index,
            ?decision,
            best_score,
            can_win_now,
            player_can_win,
            "Computer chose move"
        );

        Ok(Choice {
            index,
            decision,
            ranked,
        })
    }
}

impl Default for MovePolicy {
    fn default() -> Self {
        Self::new(MISTAKE_CHANCE)
    }
}

/// True if the player could complete a line by moving into some empty square.
pub fn player_can_win_next_turn(board: &Board) -> bool {
    board
        .legal_moves()
        .into_iter()
        .any(|index| evaluate(&board.placed(index, Mark::Player)) == Outcome::PlayerWins)
}

/// Uniform pick from a non-empty slice.
fn pick<R: Rng + ?Sized>(moves: &[ScoredMove], rng: &mut R) -> usize {
    moves[rng.random_range(0..moves.len())].index
}
