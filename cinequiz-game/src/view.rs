//! Read-only projection of a session for UI collaborators.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Movie;
use crate::constants::ATTEMPT_BUDGET;
use crate::session::{Outcome, Session, titles_match};

/// What the player may know about the target before the game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub year: i32,
    pub genres: Vec<String>,
}

/// A logged guess with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessEntry {
    pub text: String,
    pub correct: bool,
}

/// Everything a board needs to render. `answer` is only filled once the
/// outcome is terminal, so an in-progress view never leaks the title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub date: NaiveDate,
    pub clues: Clues,
    pub attempts_remaining: u8,
    pub attempt_budget: u8,
    pub guesses: Vec<GuessEntry>,
    pub revealed_cast: Vec<String>,
    pub hints_remaining: usize,
    pub can_reveal: bool,
    pub outcome: Outcome,
    pub answer: Option<Movie>,
}

impl SessionView {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        let target = &session.target;
        Self {
            date: session.date,
            clues: Clues {
                year: target.year,
                genres: target.genres.clone(),
            },
            attempts_remaining: session.attempts_remaining,
            attempt_budget: ATTEMPT_BUDGET,
            guesses: session
                .guesses
                .iter()
                .map(|text| GuessEntry {
                    text: text.clone(),
                    correct: titles_match(text, &target.title),
                })
                .collect(),
            revealed_cast: session.revealed_cast.clone(),
            hints_remaining: session.hints_remaining(),
            can_reveal: session.can_reveal(),
            outcome: session.outcome,
            answer: session.outcome.is_terminal().then(|| target.clone()),
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self::from_session(session)
    }
}
