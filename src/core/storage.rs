//! Persistent key-value storage for document content

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;

/// Prefix shared by every document slot in the store
pub const KEY_PREFIX: &str = "tf:doc:";

/// Errors raised by a [`KeyValueStore`] write
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid storage payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Collapse a document name into its storage slot seed.
///
/// Lower-cases the name, replaces every run of characters outside `[a-z0-9]`
/// with a single `-` and strips a leading or trailing `-`.
pub fn normalize(name: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

    let lowered = name.to_lowercase();
    let collapsed = separators.replace_all(&lowered, "-");
    collapsed.trim_matches('-').to_string()
}

/// Full store key for a document name
pub fn storage_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, normalize(name))
}

/// A persistent string-to-string store
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Bytes a store entry accounts for against the quota
fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Check a pending write against an optional quota
fn check_quota(
    entries: impl Iterator<Item = usize>,
    replaced: usize,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let used: usize = entries.sum();
    let needed = used - replaced + entry_size(key, value);
    if needed > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota,
        });
    }
    Ok(())
}

/// In-memory store, used for tests and as a fallback when the disk store is unavailable
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unlimited store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once `quota` bytes are in use
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Number of stored entries
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let replaced = self
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        check_quota(
            self.entries.iter().map(|(k, v)| entry_size(k, v)),
            replaced,
            key,
            value,
            self.quota,
        )?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON file, rewritten on every write
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub fn open(path: &Path, quota: Option<usize>) -> Result<Self, StorageError> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        tracing::info!("Opened document store: {} ({} entries)", path.display(), entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            quota,
        })
    }

    fn persist(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&self.entries)?;

        // Write a sibling file first so a crash never leaves a truncated store
        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let replaced = self
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        check_quota(
            self.entries.iter().map(|(k, v)| entry_size(k, v)),
            replaced,
            key,
            value,
            self.quota,
        )?;

        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            // Keep memory in step with what is actually on disk
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// Maps document names onto store keys
pub struct StorageAdapter {
    store: Box<dyn KeyValueStore>,
}

impl StorageAdapter {
    /// Wrap a store
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the slot for `name`
    pub fn read(&self, name: &str) -> Option<String> {
        self.store.get(&storage_key(name))
    }

    /// Write `content` into the slot for `name`
    pub fn write(&mut self, name: &str, content: &str) -> Result<(), StorageError> {
        self.store.set(&storage_key(name), content)
    }
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_separators() {
        assert_eq!(normalize("Chapter 2"), "chapter-2");
        assert_eq!(normalize("  My -- Draft!! "), "my-draft");
        assert_eq!(normalize("Notes/Ideas_v2"), "notes-ideas-v2");
        assert_eq!(normalize("***"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["Chapter 2", "  Hello, World  ", "Über Café", "a--b", "-x-", "", "Untitled 10"] {
            let once = normalize(name);
            assert_eq!(normalize(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_storage_key_has_prefix() {
        assert_eq!(storage_key("Chapter 2"), "tf:doc:chapter-2");
    }

    #[test]
    fn test_colliding_names_share_a_slot() {
        let mut adapter = StorageAdapter::new(Box::new(MemoryStore::new()));
        adapter.write("My Draft", "one").unwrap();
        assert_eq!(adapter.read("my-draft").as_deref(), Some("one"));
        adapter.write("MY   DRAFT!", "two").unwrap();
        assert_eq!(adapter.read("My Draft").as_deref(), Some("two"));
    }

    #[test]
    fn test_memory_store_quota_rejects_write() {
        let mut store = MemoryStore::with_quota(20);
        store.set("k", "short").unwrap();
        let err = store.set("other", "this value is far too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("other"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_quota_counts_replacement() {
        let mut store = MemoryStore::with_quota(12);
        store.set("key", "123456789").unwrap();
        // Replacing the value frees the old bytes first
        store.set("key", "abcdefghi").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("abcdefghi"));
    }

    #[test]
    fn test_json_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonFileStore::open(&path, None).unwrap();
        assert_eq!(store.get("tf:doc:a"), None);
        store.set("tf:doc:a", "<u>hi</u>").unwrap();

        let reopened = JsonFileStore::open(&path, None).unwrap();
        assert_eq!(reopened.get("tf:doc:a").as_deref(), Some("<u>hi</u>"));
    }

    #[test]
    fn test_json_file_store_ignores_interrupted_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path, None).unwrap();
        store.set("tf:doc:a", "kept").unwrap();
        assert!(!path.with_extension("tmp").exists());

        // A write that died halfway only ever touches the sibling file
        std::fs::write(path.with_extension("tmp"), "{\"tf:doc:a\": \"half").unwrap();
        let mut reopened = JsonFileStore::open(&path, None).unwrap();
        assert_eq!(reopened.get("tf:doc:a").as_deref(), Some("kept"));

        reopened.set("tf:doc:b", "next").unwrap();
        assert!(!path.with_extension("tmp").exists());
        let content = std::fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_json_file_store_rolls_back_failed_write() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("docs");
        let path = parent.join("store.json");

        let mut store = JsonFileStore::open(&path, None).unwrap();
        store.set("tf:doc:a", "first").unwrap();

        // Swap the directory for a plain file so the next write cannot land
        std::fs::remove_dir_all(&parent).unwrap();
        std::fs::write(&parent, "not a directory").unwrap();

        let err = store.set("tf:doc:a", "second").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(store.get("tf:doc:a").as_deref(), Some("first"));

        assert!(store.set("tf:doc:b", "new").is_err());
        assert_eq!(store.get("tf:doc:b"), None);
    }

    #[test]
    fn test_json_file_store_quota_leaves_disk_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path, Some(24)).unwrap();
        store.set("tf:doc:a", "small").unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();

        let err = store.set("tf:doc:b", "far too long for the quota").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 24, .. }));
        assert_eq!(store.get("tf:doc:b"), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);
    }

    #[test]
    fn test_json_file_store_rejects_bad_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonFileStore::open(&path, None).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
