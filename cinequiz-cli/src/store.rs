//! File-backed key-value store: one file per key inside a data directory.
use cinequiz_game::KvStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileStoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| FileStoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if file_name.starts_with('.') {
            file_name.replace_range(..1, "_");
        }
        self.dir.join(file_name)
    }
}

impl KvStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileStoreError::io(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, value).map_err(|e| FileStoreError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| FileStoreError::io(&path, e))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FileStoreError::io(&path, e)),
        }
    }
}

/// Default data directory: the platform data dir, else `.cinequiz` in the cwd.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".cinequiz"), |dir| dir.join("cinequiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cinequiz-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let store = FileStore::open(temp_dir("roundtrip")).expect("open store");
        assert_eq!(store.get("cinequiz.quizState").unwrap(), None);

        store.set("cinequiz.quizState", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get("cinequiz.quizState").unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        store.set("cinequiz.quizState", "{}").unwrap();
        assert_eq!(store.get("cinequiz.quizState").unwrap().as_deref(), Some("{}"));

        store.remove("cinequiz.quizState").unwrap();
        store.remove("cinequiz.quizState").unwrap();
        assert_eq!(store.get("cinequiz.quizState").unwrap(), None);
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let store = FileStore::open(temp_dir("escape")).expect("open store");
        store.set("../outside/key", "v").unwrap();
        let path = store.path_for("../outside/key");
        assert_eq!(path.parent(), Some(store.dir()));
        assert!(path.exists());
    }

    #[test]
    fn reopened_store_sees_previous_values() {
        let dir = temp_dir("reopen");
        FileStore::open(&dir).unwrap().set("k", "v").unwrap();
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }
}
