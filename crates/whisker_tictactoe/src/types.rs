//! Core domain types for tic-tac-toe.

use crate::error::MoveError;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Number of squares on the board.
pub const BOARD_SIZE: usize = 9;

/// Which side placed a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum Mark {
    /// The human player, drawn as `X`. Always moves first.
    Player,
    /// The engine, drawn as `O`.
    Computer,
}

impl Mark {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Player => Mark::Computer,
            Mark::Computer => Mark::Player,
        }
    }

    /// Board symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Computer => 'O',
        }
    }
}

/// A square on the tic-tac-toe board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by one side.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// 3x3 tic-tac-toe board.
///
/// A board is a plain value. Nothing mutates it in place through the public
/// API: [`Board::apply_move`] hands back a new board and leaves the receiver
/// alone, so a board passed into the search can never come back altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Square; BOARD_SIZE],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; BOARD_SIZE],
        }
    }

    /// Builds a board from raw squares.
    pub fn from_squares(squares: [Square; BOARD_SIZE]) -> Self {
        Self { squares }
    }

    /// Gets the square at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks if a square is empty. Out-of-range indices are never empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; BOARD_SIZE] {
        &self.squares
    }

    /// Indices of every empty square, ascending.
    pub fn legal_moves(&self) -> Vec<usize> {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == Square::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns a copy of this board with `mark` placed at `index`.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] for an index outside 0-8 and
    /// [`MoveError::SquareOccupied`] when the square already holds a mark.
    #[instrument(skip(self))]
    pub fn apply_move(&self, index: usize, mark: Mark) -> Result<Board, MoveError> {
        match self.get(index) {
            None => Err(MoveError::OutOfRange(index)),
            Some(Square::Occupied(_)) => Err(MoveError::SquareOccupied(index)),
            Some(Square::Empty) => Ok(self.placed(index, mark)),
        }
    }

    /// Unchecked placement for indices already known to be empty.
    pub(crate) fn placed(&self, index: usize, mark: Mark) -> Board {
        let mut next = *self;
        next.squares[index] = Square::Occupied(mark);
        next
    }

    /// Formats the board as a human-readable grid. Empty squares show their index.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => result.push_str(&pos.to_string()),
                    Square::Occupied(mark) => result.push(mark.symbol()),
                }
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Error parsing a board from text.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum BoardParseError {
    /// Wrong number of squares.
    #[display("Expected 9 squares, found {}", _0)]
    WrongLength(#[error(not(source))] usize),
    /// A character that is not a square symbol.
    #[display("Unexpected square symbol {:?}", _0)]
    BadSymbol(#[error(not(source))] char),
}

impl FromStr for Board {
    type Err = BoardParseError;

    /// Parses `X`, `O` and `.`/`_`/`-` for empty, ignoring whitespace and `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::with_capacity(BOARD_SIZE);
        for c in s.chars().filter(|c| !c.is_whitespace() && *c != '|') {
            let square = match c.to_ascii_uppercase() {
                'X' => Square::Occupied(Mark::Player),
                'O' => Square::Occupied(Mark::Computer),
                '.' | '_' | '-' => Square::Empty,
                other => return Err(BoardParseError::BadSymbol(other)),
            };
            squares.push(square);
        }
        let squares: [Square; BOARD_SIZE] = squares
            .try_into()
            .map_err(|v: Vec<Square>| BoardParseError::WrongLength(v.len()))?;
        Ok(Self { squares })
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for square in &self.squares {
            let c = match square {
                Square::Empty => '.',
                Square::Occupied(mark) => mark.symbol(),
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
