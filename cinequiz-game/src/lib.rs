//! Cinequiz Game Engine
//!
//! Platform-agnostic core logic for the Cinequiz daily movie quiz.
//! This crate provides the daily selector and the session state machine
//! without UI or platform-specific dependencies.

pub mod catalog;
pub mod constants;
pub mod daily;
pub mod quiz;
pub mod session;
pub mod storage;
pub mod view;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogError, CatalogSource, EmbeddedCatalog, Movie, recover_catalog,
    resolve_catalog, suggest_titles,
};
pub use constants::{ATTEMPT_BUDGET, LAST_PLAYED_KEY, SESSION_KEY, SUGGESTION_LIMIT};
pub use daily::{day_index, select_daily};
pub use quiz::{Quiz, QuizError, SessionOrigin};
pub use session::{GuessOutcome, HintOutcome, Outcome, Session, SessionInvariantError};
pub use storage::{KvStore, MemoryStore, PersistError, SessionRecord};
pub use view::{Clues, GuessEntry, SessionView};

use chrono::NaiveDate;

/// Resolve the catalog from `source` (falling back on failure) and resume or
/// start today's quiz on `store`.
///
/// # Errors
///
/// Returns [`QuizError::NoMovieAvailable`] if the resolved catalog is empty
/// and there is no session to resume.
pub fn start_quiz<C, S>(source: &C, store: S, today: NaiveDate) -> Result<Quiz<S>, QuizError>
where
    C: CatalogSource,
    S: KvStore,
{
    Quiz::initialize(store, resolve_catalog(source), today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureSource;

    impl CatalogSource for FixtureSource {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::from_movies(vec![
                Movie::new("Alien", 1979, ["Horror", "Sci-Fi"], ["Sigourney Weaver"]),
                Movie::new("Heat", 1995, ["Crime"], ["Al Pacino", "Robert De Niro"]),
            ]))
        }
    }

    #[derive(Clone, Copy, Default)]
    struct EmptySource;

    impl CatalogSource for EmptySource {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Ok(Catalog::empty())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn start_quiz_picks_daily_movie_and_roundtrips() {
        let store = MemoryStore::new();
        // Ordinal 2 -> index 0.
        let mut quiz = start_quiz(&FixtureSource, store.clone(), date(2025, 1, 2)).unwrap();
        assert_eq!(quiz.session().target.title, "Alien");
        quiz.submit_guess("Aliens");
        drop(quiz);

        let resumed = start_quiz(&FixtureSource, store, date(2025, 1, 2)).unwrap();
        assert_eq!(resumed.origin(), SessionOrigin::Resumed);
        assert_eq!(resumed.session().guesses, vec!["Aliens"]);
    }

    #[test]
    fn empty_source_is_not_replaced_by_fallback() {
        let result = start_quiz(&EmptySource, MemoryStore::new(), date(2025, 1, 2));
        assert!(matches!(result, Err(QuizError::NoMovieAvailable)));
    }
}
