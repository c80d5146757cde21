//! JSON file cache for geocoding responses.
//!
//! Every call loads the whole file, and `put` writes the whole file back.
//! Nothing is held in memory between calls, so separate `GeoCache` values
//! pointing at the same file always see each other's writes. Within one
//! value the load-mutate-save sequence runs under a mutex. Separate
//! processes writing the same file can still lose an update.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::CacheError;

const ZIP_PREFIX: &str = "zip:";
const CITY_STATE_PREFIX: &str = "city_state:";

/// Cache key for a normalized postal code.
pub fn cache_key_zip(code: &str) -> String {
    format!("{}{}", ZIP_PREFIX, code)
}

/// Cache key for a city/state query, using the input as supplied.
pub fn cache_key_city_state(raw: &str) -> String {
    format!("{}{}", CITY_STATE_PREFIX, raw)
}

#[derive(Debug)]
pub struct GeoCache {
    cache_path: PathBuf,
    lock: Mutex<()>,
}

impl GeoCache {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    /// Look up `key`, reading the file afresh.
    pub fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        Ok(map.remove(key))
    }

    /// Set `key` to `value` and persist the whole mapping.
    pub fn put(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let _guard = self.lock.lock();
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value);
        self.write_map(&map)?;
        tracing::debug!("Cached {} in {}", key, self.cache_path.display());
        Ok(())
    }

    /// Load the full mapping. A missing or blank file is an empty mapping.
    pub fn load(&self) -> Result<Map<String, Value>, CacheError> {
        let _guard = self.lock.lock();
        self.read_map()
    }

    /// Replace the full mapping on disk.
    pub fn save(&self, map: &Map<String, Value>) -> Result<(), CacheError> {
        let _guard = self.lock.lock();
        self.write_map(map)
    }

    fn read_map(&self) -> Result<Map<String, Value>, CacheError> {
        let contents = match std::fs::read_to_string(&self.cache_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), CacheError> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.cache_path, json)?;
        Ok(())
    }
}
