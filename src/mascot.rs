//! The cat that comments on each finished match.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use whisker_tictactoe::MatchResult;

/// Mood of the mascot, keyed by how the match ended for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// The player won.
    Happy,
    /// The player lost.
    Sad,
    /// Nobody won.
    Draw,
}

impl From<MatchResult> for Mood {
    fn from(result: MatchResult) -> Self {
        match result {
            MatchResult::PlayerWins => Mood::Happy,
            MatchResult::ComputerWins => Mood::Sad,
            MatchResult::Draw => Mood::Draw,
        }
    }
}

impl Mood {
    fn faces(self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["(=^･ω･^=)", "(=^-ω-^=)", "ฅ^•ﻌ•^ฅ", "(=①ω①=)", "(^・ω・^)", "(=^･^=)"],
            Mood::Sad => &["(=ㅇ︿ㅇ=)", "(=;ェ;=)", "(=･ｪ･=)", "(=｡ェ｡=)", "(=T_T=)"],
            Mood::Draw => &["(=･ω･=)", "(=^･ｪ･^=)", "(=｀ω´=)", "ฅ(^ω^ฅ)"],
        }
    }

    fn messages(self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &[
                "Meow! You're simply great!",
                "Purr-purr! Keep it up!",
                "You're the best! Meeeow~",
                "Victory! Treat me to a snack~",
                "I knew you could do it!",
                "Bravo! Purrr~",
            ],
            Mood::Sad => &[
                "Don't be sad! Try again~",
                "Meow... Next time for sure!",
                "I believe in you! One more round?",
                "No big deal! I've got your back~",
                "Purr... You did great anyway!",
            ],
            Mood::Draw => &[
                "A draw is not bad either, meow!",
                "A worthy game! Purr~",
                "You both did well!",
                "Hmm, an interesting match! Again?",
            ],
        }
    }
}

/// A face and a line from the cat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatLine {
    /// Mood the line was picked for.
    pub mood: Mood,
    /// ASCII cat face.
    pub face: &'static str,
    /// What the cat says.
    pub message: &'static str,
}

impl std::fmt::Display for CatLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}", self.face, self.message)
    }
}

/// Picks a random face and message for a finished match.
pub fn react<R: Rng + ?Sized>(result: MatchResult, rng: &mut R) -> CatLine {
    let mood = Mood::from(result);
    CatLine {
        mood,
        face: mood.faces().choose(rng).copied().unwrap_or("(=^･^=)"),
        message: mood.messages().choose(rng).copied().unwrap_or("Meow!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_reaction_matches_mood() {
        let mut rng = SmallRng::seed_from_u64(1);
        for result in [MatchResult::PlayerWins, MatchResult::ComputerWins, MatchResult::Draw] {
            let line = react(result, &mut rng);
            let mood = Mood::from(result);
            assert_eq!(line.mood, mood);
            assert!(mood.faces().contains(&line.face));
            assert!(mood.messages().contains(&line.message));
        }
    }
}
