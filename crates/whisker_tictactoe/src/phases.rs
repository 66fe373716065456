//! Outcomes and session phases.

use serde::{Deserialize, Serialize};

/// What a board says about the match. Always derived fresh from a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No line completed and at least one empty square.
    InProgress,
    /// The human completed a line.
    PlayerWins,
    /// The engine completed a line.
    ComputerWins,
    /// Full board, no line.
    Draw,
}

impl Outcome {
    /// Returns true for anything but `InProgress`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// The terminal result, if the match is over.
    pub fn result(&self) -> Option<MatchResult> {
        match self {
            Outcome::InProgress => None,
            Outcome::PlayerWins => Some(MatchResult::PlayerWins),
            Outcome::ComputerWins => Some(MatchResult::ComputerWins),
            Outcome::Draw => Some(MatchResult::Draw),
        }
    }
}

/// How a finished match ended.
///
/// This is what `Finished` carries, so a finished session never lacks a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    /// The human won.
    PlayerWins,
    /// The engine won.
    ComputerWins,
    /// Nobody won.
    Draw,
}

impl From<MatchResult> for Outcome {
    fn from(result: MatchResult) -> Self {
        match result {
            MatchResult::PlayerWins => Outcome::PlayerWins,
            MatchResult::ComputerWins => Outcome::ComputerWins,
            MatchResult::Draw => Outcome::Draw,
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::PlayerWins => write!(f, "Player wins"),
            MatchResult::ComputerWins => write!(f, "Computer wins"),
            MatchResult::Draw => write!(f, "Draw"),
        }
    }
}

/// Phase of one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase", content = "result")]
pub enum SessionState {
    /// The human is to move.
    AwaitingPlayerMove,
    /// The engine is to move.
    AwaitingComputerMove,
    /// The match is over.
    Finished(MatchResult),
}

impl SessionState {
    /// Returns true once the match is over.
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionState::Finished(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_state_wire_shape() {
        assert_eq!(
            serde_json::to_value(SessionState::AwaitingPlayerMove).unwrap(),
            json!({"phase": "awaiting_player_move"})
        );
        let finished = SessionState::Finished(MatchResult::ComputerWins);
        let value = serde_json::to_value(finished).unwrap();
        assert_eq!(value, json!({"phase": "finished", "result": "computer_wins"}));
        assert_eq!(serde_json::from_value::<SessionState>(value).unwrap(), finished);
    }

    #[test]
    fn test_outcome_wire_names() {
        assert_eq!(serde_json::to_value(Outcome::InProgress).unwrap(), json!("in_progress"));
        assert_eq!(
            serde_json::from_value::<Outcome>(json!("player_wins")).unwrap(),
            Outcome::PlayerWins
        );
    }

    #[test]
    fn test_terminal_outcomes_carry_results() {
        assert_eq!(Outcome::InProgress.result(), None);
        for result in [MatchResult::PlayerWins, MatchResult::ComputerWins, MatchResult::Draw] {
            let outcome = Outcome::from(result);
            assert!(outcome.is_terminal());
            assert_eq!(outcome.result(), Some(result));
        }
    }
}
