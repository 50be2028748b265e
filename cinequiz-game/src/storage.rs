//! Key-value persistence seam and the persisted session record.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use thiserror::Error;

use crate::constants::SAVE_VERSION;
use crate::session::{Session, SessionInvariantError};

/// Trait for abstracting client-scoped string storage.
/// Platform-specific implementations should provide this.
pub trait KvStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`; removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// In-memory store. Clones share the same map, so a clone can stand in for
/// "the same browser" across simulated reloads.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KvStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Reasons a stored session is discarded instead of resumed.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("stored session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored session has schema version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },
    #[error("stored session is dated {stored}, expected {expected}")]
    DateMismatch {
        stored: NaiveDate,
        expected: NaiveDate,
    },
    #[error("stored session violates invariants: {0}")]
    Invariant(#[from] SessionInvariantError),
}

/// Versioned envelope written under [`crate::constants::SESSION_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub version: u32,
    pub session: Session,
}

impl SessionRecord {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            version: SAVE_VERSION,
            session,
        }
    }

    /// Serialize the session into its stored form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(session: &Session) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Borrowed<'a> {
            version: u32,
            session: &'a Session,
        }
        serde_json::to_string(&Borrowed {
            version: SAVE_VERSION,
            session,
        })
    }

    /// Parse and validate a stored session that should belong to `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed, from another schema version,
    /// dated for another day, or breaks a session invariant.
    pub fn decode(raw: &str, expected: NaiveDate) -> Result<Session, PersistError> {
        let record: Self = serde_json::from_str(raw)?;
        if record.version != SAVE_VERSION {
            return Err(PersistError::Version {
                found: record.version,
                expected: SAVE_VERSION,
            });
        }
        if record.session.date != expected {
            return Err(PersistError::DateMismatch {
                stored: record.session.date,
                expected,
            });
        }
        record.session.validate()?;
        Ok(record.session)
    }
}
