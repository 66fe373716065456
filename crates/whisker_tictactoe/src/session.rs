//! One match between the human and the engine.
//!
//! The session is a small state machine:
//!
//! ```text
//! AwaitingPlayerMove --player move--> AwaitingComputerMove --computer move--> AwaitingPlayerMove
//!          \                                   \
//!           `--terminal--> Finished(result) <---'
//! ```
//!
//! A move in the wrong state fails with a [`MoveError`] and changes nothing.
//! Every successful change bumps a revision counter. A computer move is planned
//! against one revision and committed only if nothing has changed since, so a
//! reply computed before a reset cannot land on the new board.

use crate::error::{GameError, MoveError};
use crate::phases::{MatchResult, Outcome, SessionState};
use crate::policy::MovePolicy;
use crate::rules::evaluate;
use crate::{Board, Mark};
use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// A mark that was placed, and the result if it ended the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Board index (0-8).
    pub index: usize,
    /// Who moved.
    pub mark: Mark,
    /// `Some` exactly once per match: on the move that finished it.
    pub result: Option<MatchResult>,
}

/// A computer move chosen for a specific revision of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedMove {
    /// Board index (0-8).
    pub index: usize,
    /// Session revision the move was computed against.
    pub revision: u64,
}

/// Read-only view of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current board.
    board: Board,
    /// Whose turn, or the final result.
    state: SessionState,
    /// Outcome derived from the board.
    outcome: Outcome,
}

/// State machine for a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    state: SessionState,
    revision: u64,
}

impl GameSession {
    /// Starts a match: empty board, player to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            state: SessionState::AwaitingPlayerMove,
            revision: 0,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Revision counter, bumped by every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Board, phase and outcome in one value.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board,
            state: self.state,
            outcome: evaluate(&self.board),
        }
    }

    /// Places the player's mark.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameOver`] once finished, [`MoveError::NotYourTurn`] while
    /// the computer is to move, and the board's range/occupancy errors.
    #[instrument(skip(self), fields(revision = self.revision))]
    pub fn apply_player_move(&mut self, index: usize) -> Result<Placement, MoveError> {
        match self.state {
            SessionState::AwaitingPlayerMove => {}
            SessionState::AwaitingComputerMove => {
                warn!(index, "Player moved out of turn");
                return Err(MoveError::NotYourTurn);
            }
            SessionState::Finished(_) => {
                warn!(index, "Player moved after the match ended");
                return Err(MoveError::GameOver);
            }
        }

        self.place(index, Mark::Player)
    }

    /// Asks the policy for the computer's move without applying it.
    ///
    /// # Errors
    ///
    /// [`MoveError::NotYourTurn`] / [`MoveError::GameOver`] in the wrong phase.
    /// [`GameError::NoLegalMove`] cannot happen while the state machine holds.
    #[instrument(skip(self, policy, rng), fields(revision = self.revision))]
    pub fn plan_computer_move<R: Rng + ?Sized>(
        &self,
        policy: &MovePolicy,
        rng: &mut R,
    ) -> Result<PlannedMove, GameError> {
        self.expect_computer_turn()?;
        let index = policy.choose_move(&self.board, rng)?;
        Ok(PlannedMove {
            index,
            revision: self.revision,
        })
    }

    /// Applies a move from [`GameSession::plan_computer_move`].
    ///
    /// # Errors
    ///
    /// [`MoveError::StalePlan`] if the session changed after planning.
    #[instrument(skip(self), fields(revision = self.revision))]
    pub fn commit_computer_move(&mut self, plan: PlannedMove) -> Result<Placement, MoveError> {
        if plan.revision != self.revision {
            debug!(
                planned = plan.revision,
                current = self.revision,
                "Discarding stale computer move"
            );
            return Err(MoveError::StalePlan);
        }
        self.expect_computer_turn()?;
        self.place(plan.index, Mark::Computer)
    }

    /// Plans and commits the computer's move in one step.
    ///
    /// # Errors
    ///
    /// Same as [`GameSession::plan_computer_move`].
    pub fn request_computer_move<R: Rng + ?Sized>(
        &mut self,
        policy: &MovePolicy,
        rng: &mut R,
    ) -> Result<Placement, GameError> {
        let plan = self.plan_computer_move(policy, rng)?;
        Ok(self.commit_computer_move(plan)?)
    }

    /// Throws the current match away and starts a fresh one.
    #[instrument(skip(self), fields(revision = self.revision))]
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.state = SessionState::AwaitingPlayerMove;
        self.revision += 1;
        info!("Match reset");
    }

    fn expect_computer_turn(&self) -> Result<(), MoveError> {
        match self.state {
            SessionState::AwaitingComputerMove => Ok(()),
            SessionState::AwaitingPlayerMove => Err(MoveError::NotYourTurn),
            SessionState::Finished(_) => Err(MoveError::GameOver),
        }
    }

    fn place(&mut self, index: usize, mark: Mark) -> Result<Placement, MoveError> {
        self.board = self.board.apply_move(index, mark)?;
        self.revision += 1;

        let result = evaluate(&self.board).result();
        self.state = match (result, mark) {
            (Some(result), _) => {
                info!(%result, board = %self.board, "Match finished");
                SessionState::Finished(result)
            }
            (None, Mark::Player) => SessionState::AwaitingComputerMove,
            (None, Mark::Computer) => SessionState::AwaitingPlayerMove,
        };

        Ok(Placement {
            index,
            mark,
            result,
        })
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
