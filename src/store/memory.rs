/// Persistent response memory
///
/// Maps a normalized command to the response it produced last time.
/// The whole map is rewritten as pretty-printed JSON on every write.

use crate::error::Result;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value memory backed by a JSON file
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create a store bound to a JSON file
    ///
    /// Nothing is read until `load_all` is called.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            entries: BTreeMap::new(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Create a store that never touches the disk
    ///
    /// Used for testing and for one-off runs without a data directory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store and load whatever is already on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let mut store = Self::new(path);
        store.load_all();
        store
    }

    /// Load every entry from disk, replacing what is in memory
    ///
    /// A missing, unreadable or corrupt file leaves the store empty.
    /// Never fails; returns the number of entries loaded.
    pub fn load_all(&mut self) -> usize {
        let Some(path) = self.path.clone() else {
            return self.entries.len();
        };

        self.entries = match Self::read_file(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load memory from {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        info!("Memory loaded: {} entries", self.entries.len());
        self.entries.len()
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the full map to disk
    pub fn save_all(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;

        info!("Memory saved: {} entries", self.entries.len());
        Ok(())
    }

    /// Look up a stored response
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store a response and persist immediately
    ///
    /// Last write wins. A failed save is logged, the in-memory value stays.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
        self.persist();
    }

    /// Remove one entry, returning its value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.persist();
        }
        removed
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.save_all() {
            warn!("Failed to save memory: {}", e);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_and_get() {
        let mut store = MemoryStore::in_memory();
        store.put("who is ada lovelace", "A mathematician.");

        assert_eq!(store.get("who is ada lovelace"), Some("A mathematician."));
        assert_eq!(store.get("who is grace hopper"), None);
    }

    #[test]
    fn test_last_write_wins_and_survives_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memory.json");

        let mut store = MemoryStore::new(&path);
        store.put("capital of france", "Paris is the capital.");
        store.put("capital of france", "Paris.");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("capital of france"), Some("Paris."));

        let reloaded = MemoryStore::open(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("capital of france"), Some("Paris."));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("memory.json");

        let mut store = MemoryStore::new(&path);
        store.put("a", "1");
        store.put("b", "2");
        store.save_all().unwrap();

        let mut fresh = MemoryStore::new(&path);
        assert_eq!(fresh.load_all(), 2);
        let original: Vec<_> = store.entries().collect();
        let loaded: Vec<_> = fresh.entries().collect();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memory.json");
        fs::write(&path, r#"{"hello": "Hi there."}"#).unwrap();

        let mut store = MemoryStore::new(&path);
        assert_eq!(store.load_all(), 1);
        assert_eq!(store.load_all(), 1);
        assert_eq!(store.get("hello"), Some("Hi there."));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::open(temp.path().join("absent.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memory.json");
        fs::write(&path, "{ not json").unwrap();

        let store = MemoryStore::open(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_is_pretty_printed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memory.json");

        let mut store = MemoryStore::new(&path);
        store.put("ping", "pong");

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("\"ping\": \"pong\""));
    }

    #[test]
    fn test_remove_and_clear() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("memory.json");

        let mut store = MemoryStore::new(&path);
        store.put("one", "1");
        store.put("two", "2");

        assert_eq!(store.remove("one"), Some("1".to_string()));
        assert_eq!(store.remove("one"), None);
        assert_eq!(MemoryStore::open(&path).len(), 1);

        store.clear();
        assert!(MemoryStore::open(&path).is_empty());
    }
}
