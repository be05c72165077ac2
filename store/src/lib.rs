use anyhow::Result;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{collections::HashMap, fs, path::PathBuf};

/// String-keyed JSON storage shared by every feature of the app.
///
/// Reads hand back the whole value under a key and writes replace it
/// wholesale; there is no partial update and the last writer wins.
pub trait Store: Send + Sync {
    /// Retrieve a value by key.
    fn get(&self, key: &str) -> Option<Value>;
    /// Store a value under a key.
    fn put(&self, key: &str, value: Value) -> Result<()>;
    /// Remove a key and its value.
    fn remove(&self, key: &str) -> Result<()>;
    /// All keys currently present.
    fn keys(&self) -> Vec<String>;
}

/// Read a typed value, falling back to the default when the key is missing
/// or its JSON no longer matches the expected shape.
pub fn read_or_default<T>(store: &dyn Store, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key) {
        None => T::default(),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("discarding corrupt value under {key}: {err}");
                T::default()
            }
        },
    }
}

/// Serialize a typed value and store it under a key.
pub fn write_json<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> Result<()> {
    store.put(key, serde_json::to_value(value)?)
}

/// Volatile store used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        self.data.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.data.lock().keys().cloned().collect()
    }
}

/// Write-through store persisted as a single JSON file.
pub struct JsonFileStore {
    file: PathBuf,
    data: Mutex<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `file`, creating parent directories on demand.
    /// A file that no longer parses is reset to empty rather than refused.
    pub fn open(file: impl Into<PathBuf>) -> Result<Self> {
        let file = file.into();
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = match fs::read(&file) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                tracing::warn!("resetting corrupt store file {}: {err}", file.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Ok(Self {
            file,
            data: Mutex::new(data),
        })
    }

    fn persist(&self, data: &HashMap<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec(data)?;
        fs::write(&self.file, bytes)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.lock();
        data.insert(key.to_string(), value);
        self.persist(&data)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut data = self.data.lock();
        if data.remove(key).is_some() {
            self.persist(&data)?;
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.data.lock().keys().cloned().collect()
    }
}
