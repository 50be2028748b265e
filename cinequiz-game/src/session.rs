use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::catalog::Movie;
use crate::constants::ATTEMPT_BUDGET;

/// Where a daily session stands. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of submitting a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Incorrect { attempts_remaining: u8 },
    /// The session was already over; nothing changed.
    Ignored,
}

/// Result of asking for a cast hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Revealed { name: String, attempts_remaining: u8 },
    /// Session over or every cast member already shown; nothing changed.
    Ignored,
}

/// Ways a deserialized session can contradict the game rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionInvariantError {
    #[error("attempts remaining {found} exceeds budget {budget}")]
    AttemptsOverBudget { found: u8, budget: u8 },
    #[error("attempts remaining {found} does not match {expected} derived from the logs")]
    AttemptsMismatch { found: u8, expected: i32 },
    #[error("revealed cast member {0:?} is not in the target cast")]
    UnknownCast(String),
    #[error("cast member {0:?} revealed twice")]
    DuplicateCast(String),
    #[error("revealed cast out of order: expected {expected:?}, found {found:?}")]
    CastOrder { expected: String, found: String },
    #[error("outcome {found} contradicts the guess log (expected {expected})")]
    OutcomeMismatch { found: Outcome, expected: Outcome },
    #[error("guesses recorded after the winning guess")]
    GuessAfterWin,
}

/// One client's gameplay state for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub target: Movie,
    pub attempts_remaining: u8,
    #[serde(default)]
    pub guesses: Vec<String>,
    #[serde(default)]
    pub revealed_cast: Vec<String>,
    #[serde(default)]
    pub outcome: Outcome,
    pub date: NaiveDate,
}

/// Case-insensitive, whitespace-trimmed title comparison. Punctuation,
/// accents and leading articles must match exactly.
#[must_use]
pub fn titles_match(guess: &str, title: &str) -> bool {
    guess.trim().to_lowercase() == title.trim().to_lowercase()
}

impl Session {
    /// Fresh in-progress session for `target` on `date`.
    #[must_use]
    pub fn new(target: Movie, date: NaiveDate) -> Self {
        Self {
            target,
            attempts_remaining: ATTEMPT_BUDGET,
            guesses: Vec::new(),
            revealed_cast: Vec::new(),
            outcome: Outcome::InProgress,
            date,
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_terminal() || self.attempts_remaining == 0
    }

    #[must_use]
    pub fn is_correct(&self, guess: &str) -> bool {
        titles_match(guess, &self.target.title)
    }

    #[must_use]
    pub fn hints_remaining(&self) -> usize {
        self.target
            .cast
            .iter()
            .filter(|name| !self.revealed_cast.contains(name))
            .collect::<HashSet<_>>()
            .len()
    }

    #[must_use]
    pub fn can_reveal(&self) -> bool {
        !self.is_over() && self.next_hint().is_some()
    }

    /// Lowest-index cast member not yet revealed.
    #[must_use]
    pub fn next_hint(&self) -> Option<&str> {
        self.target
            .cast
            .iter()
            .find(|name| !self.revealed_cast.contains(name))
            .map(String::as_str)
    }

    /// Record a guess. The raw text is logged as typed.
    pub fn submit_guess(&mut self, raw: &str) -> GuessOutcome {
        if self.is_over() {
            return GuessOutcome::Ignored;
        }
        self.guesses.push(raw.to_string());
        if self.is_correct(raw) {
            self.outcome = Outcome::Won;
            return GuessOutcome::Correct;
        }
        self.consume_attempt();
        GuessOutcome::Incorrect {
            attempts_remaining: self.attempts_remaining,
        }
    }

    /// Trade one attempt for the next cast member.
    pub fn reveal_hint(&mut self) -> HintOutcome {
        if self.is_over() {
            return HintOutcome::Ignored;
        }
        let Some(name) = self.next_hint().map(str::to_string) else {
            return HintOutcome::Ignored;
        };
        self.revealed_cast.push(name.clone());
        self.consume_attempt();
        HintOutcome::Revealed {
            name,
            attempts_remaining: self.attempts_remaining,
        }
    }

    fn consume_attempt(&mut self) {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        if self.attempts_remaining == 0 {
            self.outcome = Outcome::Lost;
        }
    }

    /// Check a session (typically a freshly loaded one) against the game rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), SessionInvariantError> {
        if self.attempts_remaining > ATTEMPT_BUDGET {
            return Err(SessionInvariantError::AttemptsOverBudget {
                found: self.attempts_remaining,
                budget: ATTEMPT_BUDGET,
            });
        }

        let mut seen = HashSet::new();
        for (idx, name) in self.revealed_cast.iter().enumerate() {
            if !self.target.cast.contains(name) {
                return Err(SessionInvariantError::UnknownCast(name.clone()));
            }
            if !seen.insert(name) {
                return Err(SessionInvariantError::DuplicateCast(name.clone()));
            }
            if let Some(expected) = self.target.cast.get(idx)
                && expected != name
            {
                return Err(SessionInvariantError::CastOrder {
                    expected: expected.clone(),
                    found: name.clone(),
                });
            }
        }

        let winning = self.guesses.iter().position(|g| self.is_correct(g));
        if let Some(pos) = winning
            && pos + 1 != self.guesses.len()
        {
            return Err(SessionInvariantError::GuessAfterWin);
        }

        let misses = self.guesses.len() - usize::from(winning.is_some());
        let consumed = i32::try_from(misses + self.revealed_cast.len()).unwrap_or(i32::MAX);
        let expected_attempts = i32::from(ATTEMPT_BUDGET) - consumed;
        if expected_attempts != i32::from(self.attempts_remaining) {
            return Err(SessionInvariantError::AttemptsMismatch {
                found: self.attempts_remaining,
                expected: expected_attempts,
            });
        }

        let expected_outcome = if winning.is_some() {
            Outcome::Won
        } else if self.attempts_remaining == 0 {
            Outcome::Lost
        } else {
            Outcome::InProgress
        };
        if expected_outcome != self.outcome {
            return Err(SessionInvariantError::OutcomeMismatch {
                found: self.outcome,
                expected: expected_outcome,
            });
        }
        Ok(())
    }
}
