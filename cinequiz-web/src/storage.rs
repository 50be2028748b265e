//! Browser persistence over `window.localStorage`.

use cinequiz_game::{KvStore, MemoryStore};
use web_sys::Storage;

use crate::dom;

/// Web-specific quiz storage using localStorage.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebStorageError {
    fn from_js(value: &wasm_bindgen::JsValue) -> Self {
        Self::Storage(dom::js_error_message(value))
    }
}

impl LocalStorageStore {
    /// Bind to the page's `localStorage`.
    ///
    /// # Errors
    /// Returns an error when storage is disabled or there is no browser window.
    pub fn open() -> Result<Self, WebStorageError> {
        dom::local_storage()
            .map(Self::new)
            .map_err(|err| WebStorageError::from_js(&err))
    }

    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

impl KvStore for LocalStorageStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        self.storage
            .get_item(key)
            .map_err(|err| WebStorageError::from_js(&err))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        // Quota errors surface here; the quiz logs them and keeps playing.
        self.storage
            .set_item(key, value)
            .map_err(|err| WebStorageError::from_js(&err))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.storage
            .remove_item(key)
            .map_err(|err| WebStorageError::from_js(&err))
    }
}

/// Store used by the page: `localStorage` when the browser allows it,
/// otherwise an in-memory map that lasts as long as the page.
#[derive(Debug, Clone)]
pub enum BrowserStore {
    Local(LocalStorageStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    /// Open `localStorage`, degrading to memory (progress is lost on reload).
    #[must_use]
    pub fn open_or_memory() -> Self {
        match LocalStorageStore::open() {
            Ok(store) => Self::Local(store),
            Err(err) => {
                dom::console_error(&format!("{err}; progress will not be saved"));
                Self::Memory(MemoryStore::new())
            }
        }
    }

    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl KvStore for BrowserStore {
    type Error = WebStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match self {
            Self::Local(store) => store.get(key),
            Self::Memory(store) => Ok(store.get(key).unwrap_or_else(|never| match never {})),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        match self {
            Self::Local(store) => store.set(key, value),
            Self::Memory(store) => {
                store.set(key, value).unwrap_or_else(|never| match never {});
                Ok(())
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        match self {
            Self::Local(store) => store.remove(key),
            Self::Memory(store) => {
                store.remove(key).unwrap_or_else(|never| match never {});
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cinequiz_game::{Catalog, Movie, Quiz, SESSION_KEY};

    #[test]
    fn memory_fallback_still_plays_a_full_day() {
        let store = BrowserStore::Memory(MemoryStore::new());
        assert!(!store.is_persistent());

        let catalog = Catalog::from_movies(vec![Movie::new("Jaws", 1975, ["Thriller"], ["Roy Scheider"])]);
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut quiz = Quiz::initialize(store.clone(), catalog.clone(), today).unwrap();
        quiz.submit_guess("Orca");
        assert!(store.get(SESSION_KEY).unwrap().is_some());

        let resumed = Quiz::initialize(store, catalog, today).unwrap();
        assert_eq!(resumed.session().guesses, vec!["Orca"]);
    }
}
