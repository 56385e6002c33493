use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{
    errors::{Result, TrackerError},
    utils::persistence::write_atomic,
};

use super::KeyValueStore;

const STORE_FILE: &str = "store.json";
const CORRUPT_SUFFIX: &str = "corrupt";

/// Keeps every key in one JSON object on disk, rewritten atomically on each change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (or prepares) `store.json` inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self::at_path(dir.join(STORE_FILE)))
    }

    /// Uses `path` as the store file directly.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable store file is moved before the next write.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(CORRUPT_SUFFIX);
        PathBuf::from(name)
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok((!data.trim().is_empty()).then_some(data))
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(BTreeMap::new()),
        }
    }

    // An unparseable file is set aside so writes can start over from an empty map.
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>> {
        let Some(data) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(&data) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                let backup = self.corrupt_path();
                fs::rename(&self.path, &backup)?;
                warn!(
                    error = %err,
                    backup = %backup.display(),
                    "store file is unreadable; moved aside and starting empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TrackerError::Storage("store lock poisoned".into()))?;
        let mut entries = self.entries_for_write()?;
        f(&mut entries);
        let json = serde_json::to_string_pretty(&entries)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), keys = entries.len(), "store written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
