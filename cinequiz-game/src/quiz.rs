//! Daily quiz state machine: resume-or-initialize, mutations, persistence.
//!
//! `Quiz` owns the current [`Session`] plus the injected store and catalog.
//! Every mutating call that changes the session ends with a persistence
//! write, so a reload right after a guess observes that guess. Write
//! failures are logged and never bubble up to the player.

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::Catalog;
use crate::constants::{LAST_PLAYED_KEY, SESSION_KEY};
use crate::daily::select_daily;
use crate::session::{GuessOutcome, HintOutcome, Session};
use crate::storage::{KvStore, PersistError, SessionRecord};
use crate::view::SessionView;

/// Player-facing failures of the quiz engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuizError {
    /// The catalog resolved but had nothing to pick from. Retry-able.
    #[error("no movie is available for today's quiz")]
    NoMovieAvailable,
}

/// How the current session came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Resumed,
    Fresh,
}

/// Main quiz engine binding a session to its store and catalog.
#[derive(Debug)]
pub struct Quiz<S>
where
    S: KvStore,
{
    store: S,
    catalog: Catalog,
    today: NaiveDate,
    session: Session,
    origin: SessionOrigin,
}

impl<S> Quiz<S>
where
    S: KvStore,
{
    /// Resume today's persisted session or start a fresh one.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoMovieAvailable`] if nothing could be resumed and
    /// the catalog is empty.
    pub fn initialize(store: S, catalog: Catalog, today: NaiveDate) -> Result<Self, QuizError> {
        if let Some(session) = load_session(&store, today) {
            log::info!(
                "resuming session for {today}: {} attempts left, outcome {}",
                session.attempts_remaining,
                session.outcome
            );
            return Ok(Self {
                store,
                catalog,
                today,
                session,
                origin: SessionOrigin::Resumed,
            });
        }

        let session = fresh_session(&catalog, today)?;
        let quiz = Self {
            store,
            catalog,
            today,
            session,
            origin: SessionOrigin::Fresh,
        };
        quiz.discard_saved();
        quiz.persist();
        log::info!("started fresh session for {today}");
        Ok(quiz)
    }

    /// Submit a guess; ignored once the session is over.
    pub fn submit_guess(&mut self, raw: &str) -> GuessOutcome {
        let outcome = self.session.submit_guess(raw);
        if outcome != GuessOutcome::Ignored {
            log::debug!("guess {raw:?} -> {outcome:?}");
            self.persist();
        }
        outcome
    }

    /// Spend an attempt to reveal the next cast member.
    pub fn reveal_hint(&mut self) -> HintOutcome {
        let outcome = self.session.reveal_hint();
        if outcome != HintOutcome::Ignored {
            log::debug!("hint -> {outcome:?}");
            self.persist();
        }
        outcome
    }

    /// Throw away the current session and start today's game over.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoMovieAvailable`] if the catalog is empty; the
    /// current session is kept in that case.
    pub fn reset(&mut self) -> Result<(), QuizError> {
        self.session = fresh_session(&self.catalog, self.today)?;
        self.origin = SessionOrigin::Fresh;
        self.discard_saved();
        self.persist();
        log::info!("session for {} reset", self.today);
        Ok(())
    }

    /// Move the engine to `today`, starting a new session when the calendar
    /// day changed since the current one was created. Returns whether a new
    /// session was started.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoMovieAvailable`] if a new day starts with an
    /// empty catalog.
    pub fn roll_over(&mut self, today: NaiveDate) -> Result<bool, QuizError> {
        if today == self.today {
            return Ok(false);
        }
        let session = fresh_session(&self.catalog, today)?;
        self.today = today;
        self.session = session;
        self.origin = SessionOrigin::Fresh;
        self.discard_saved();
        self.persist();
        log::info!("day changed; started fresh session for {today}");
        Ok(true)
    }

    /// Swap in a freshly fetched catalog. The running session is untouched;
    /// the new catalog is used from the next reset or day change.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::from_session(&self.session)
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub const fn origin(&self) -> SessionOrigin {
        self.origin
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the engine, returning the store (e.g. to simulate a reload).
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&self) {
        let raw = match SessionRecord::encode(&self.session) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("failed to serialize session: {err}");
                return;
            }
        };
        if let Err(err) = self.store.set(SESSION_KEY, &raw) {
            log::warn!("failed to persist session: {err}");
        }
        if let Err(err) = self
            .store
            .set(LAST_PLAYED_KEY, &self.session.date.to_string())
        {
            log::warn!("failed to persist last played date: {err}");
        }
    }

    fn discard_saved(&self) {
        if let Err(err) = self.store.remove(SESSION_KEY) {
            log::warn!("failed to discard stored session: {err}");
        }
    }
}

fn fresh_session(catalog: &Catalog, today: NaiveDate) -> Result<Session, QuizError> {
    let movie = select_daily(catalog.movies(), today)?;
    Ok(Session::new(movie.clone(), today))
}

/// Read today's session from `store`. Stale, missing and corrupt records all
/// yield `None`.
fn load_session<S: KvStore>(store: &S, today: NaiveDate) -> Option<Session> {
    match store.get(LAST_PLAYED_KEY) {
        Ok(Some(marker)) if marker.trim() != today.to_string() => {
            log::info!("last played {marker}; starting a new day");
            return None;
        }
        Ok(_) => {}
        Err(err) => log::warn!("failed to read last played date: {err}"),
    }

    let raw = match store.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("failed to read stored session: {err}");
            return None;
        }
    };

    match SessionRecord::decode(&raw, today) {
        Ok(session) => Some(session),
        Err(PersistError::DateMismatch { stored, .. }) => {
            log::info!("stored session is from {stored}; starting a new day");
            None
        }
        Err(err) => {
            log::warn!("discarding corrupt stored session: {err}");
            None
        }
    }
}
