//! Small persisted key-value capability and the last-search record kept in it.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

pub const LAST_CITY_KEY: &str = "last_city";
pub const LAST_STATE_KEY: &str = "last_state";

pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Apply several writes together; `None` removes the key.
    ///
    /// Stores backed by a file override this to write once.
    fn put_all(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        for (key, value) in changes {
            match value {
                Some(value) => self.put(key, value)?,
                None => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// In-process store. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Flat TOML table on disk, rewritten on every change.
///
/// Memory only reflects a change once the file write has succeeded.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read state file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string(entries).context("Failed to serialize state to TOML")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.put_all(&[(key, Some(value))])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.put_all(&[(key, None)])
    }

    fn put_all(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        let mut entries = self.entries.lock();

        let mut staged = entries.clone();
        for (key, value) in changes {
            match value {
                Some(value) => staged.insert(key.to_string(), value.to_string()),
                None => staged.remove(*key),
            };
        }
        if staged == *entries {
            return Ok(());
        }

        self.persist(&staged)?;
        *entries = staged;
        Ok(())
    }
}

/// The most recent successful search by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub city: String,
    pub state: Option<String>,
}

impl LastSearch {
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let city = store.get(LAST_CITY_KEY).filter(|c| !c.is_empty())?;
        let state = store.get(LAST_STATE_KEY).filter(|s| !s.is_empty());
        Some(Self { city, state })
    }

    /// Write both keys in one go; an absent state clears any previous one.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.put_all(&[
            (LAST_CITY_KEY, Some(self.city.as_str())),
            (LAST_STATE_KEY, self.state.as_deref()),
        ])
    }
}
