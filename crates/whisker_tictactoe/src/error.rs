//! Error types for the decision engine.

use derive_more::{Display, From};

/// A move that cannot be applied. The session is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Position {} is out of range (must be 0-8)", _0)]
    OutOfRange(usize),

    /// The square at the index is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The other side is to move.
    #[display("It is not your turn")]
    NotYourTurn,

    /// The match is already over.
    #[display("Game is already over")]
    GameOver,

    /// A computer move planned against a board that has since changed.
    #[display("Planned move no longer matches the session")]
    StalePlan,
}

impl std::error::Error for MoveError {}

/// The move policy was asked to move on a full board.
///
/// The session state machine never does this, so seeing one means a caller
/// broke the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("No legal move available")]
pub struct NoLegalMoveError;

impl std::error::Error for NoLegalMoveError {}

/// Anything that can go wrong on the computer's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, From)]
pub enum GameError {
    /// Rejected by the state machine or the board.
    #[display("{}", _0)]
    IllegalMove(MoveError),
    /// Policy invoked without a legal move.
    #[display("{}", _0)]
    NoLegalMove(NoLegalMoveError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::IllegalMove(e) => Some(e),
            GameError::NoLegalMove(e) => Some(e),
        }
    }
}
