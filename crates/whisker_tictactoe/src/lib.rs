//! Tic-tac-toe decision engine.
//!
//! A human plays `X` against a computer playing `O`. The computer searches the
//! whole game tree with alpha-beta minimax and then, through [`MovePolicy`],
//! sometimes plays a plausible second-best move so it feels beatable.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use whisker_tictactoe::{GameSession, MovePolicy, SessionState};
//!
//! let mut session = GameSession::new();
//! let mut rng = SmallRng::seed_from_u64(42);
//!
//! session.apply_player_move(4).unwrap();
//! session.request_computer_move(&MovePolicy::default(), &mut rng).unwrap();
//! assert_eq!(session.state(), SessionState::AwaitingPlayerMove);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod phases;
mod position;
mod session;
mod types;

pub mod policy;
pub mod rules;
pub mod search;

pub use error::{GameError, MoveError, NoLegalMoveError};
pub use phases::{MatchResult, Outcome, SessionState};
pub use policy::{Choice, Decision, MISTAKE_CHANCE, MovePolicy};
pub use position::Position;
pub use rules::{WIN_LINES, evaluate};
pub use search::{ScoredMove, score, score_moves};
pub use session::{GameSession, Placement, PlannedMove, SessionSnapshot};
pub use types::{BOARD_SIZE, Board, BoardParseError, Mark, Square};
