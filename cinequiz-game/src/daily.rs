//! Deterministic daily movie selection.
//!
//! The pick depends only on the calendar date and the catalog order: the
//! 1-based ordinal day of the year modulo the catalog length.

use chrono::{Datelike, NaiveDate};

use crate::catalog::Movie;
use crate::quiz::QuizError;

/// Index of the daily movie within a catalog of `len` entries.
#[must_use]
pub fn day_index(date: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let ordinal = usize::try_from(date.ordinal()).unwrap_or(1);
    Some(ordinal % len)
}

/// Select today's movie from an ordered catalog.
///
/// # Errors
///
/// Returns [`QuizError::NoMovieAvailable`] if the catalog is empty.
pub fn select_daily(catalog: &[Movie], date: NaiveDate) -> Result<&Movie, QuizError> {
    day_index(date, catalog.len())
        .and_then(|idx| catalog.get(idx))
        .ok_or(QuizError::NoMovieAvailable)
}
