use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{LegacyExpense, Transaction};

/// Version stamped into transaction snapshots
pub const SNAPSHOT_VERSION: u32 = 1;

/// Durable key-value storage for serialized snapshots
///
/// The store keeps its whole collection under one key and rewrites it in
/// full after every mutation. Values are JSON text.
///
/// # Example
///
/// ```
/// use finance_tracker::persistence::{KeyValueStorage, MemoryStorage};
///
/// let mut storage = MemoryStorage::new();
/// storage.set_item("transactions-storage", "{}").unwrap();
///
/// assert_eq!(
///     storage.get_item("transactions-storage").unwrap().as_deref(),
///     Some("{}")
/// );
/// assert_eq!(storage.get_item("missing").unwrap(), None);
/// ```
pub trait KeyValueStorage {
    /// Read the value stored under `key`, `None` if nothing was ever written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }
}

/// Storage held in process memory
///
/// Useful for tests and for running without durability. Counts writes so
/// callers can check write-through behavior.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    write_count: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_item` calls so far
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.write_count += 1;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage backed by a directory, one `<key>.json` file per key
///
/// Writes go to a temporary sibling file, which is flushed to disk before it
/// is renamed over the target. A crash mid-write leaves the previous
/// snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        let mut file = File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Persisted layout: `{"state": {...}, "version": n}`
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<S> {
    state: S,
    #[serde(default)]
    version: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionsState {
    #[serde(default)]
    transactions: Vec<Transaction>,
    #[serde(default)]
    legacy_migrated: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LegacyState {
    #[serde(default)]
    expenses: Vec<LegacyExpense>,
}

/// Decoded transaction snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionSnapshot {
    pub transactions: Vec<Transaction>,
    /// Set once the legacy collection has been imported
    pub legacy_migrated: bool,
}

/// Read the transaction snapshot under `key`, `None` if never written
pub fn load_snapshot<S: KeyValueStorage + ?Sized>(
    storage: &S,
    key: &str,
) -> Result<Option<TransactionSnapshot>> {
    let raw = match storage.get_item(key)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    let envelope: Envelope<TransactionsState> = serde_json::from_str(&raw)?;
    debug!(
        "Loaded {} transactions from '{}' (version {})",
        envelope.state.transactions.len(),
        key,
        envelope.version
    );

    Ok(Some(TransactionSnapshot {
        transactions: envelope.state.transactions,
        legacy_migrated: envelope.state.legacy_migrated,
    }))
}

/// Serialize and write the full transaction collection under `key`
pub fn save_snapshot<S: KeyValueStorage + ?Sized>(
    storage: &mut S,
    key: &str,
    transactions: &[Transaction],
    legacy_migrated: bool,
) -> Result<()> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct StateRef<'a> {
        transactions: &'a [Transaction],
        legacy_migrated: bool,
    }

    let envelope = Envelope {
        state: StateRef {
            transactions,
            legacy_migrated,
        },
        version: SNAPSHOT_VERSION,
    };

    let json = serde_json::to_string(&envelope)?;
    storage.set_item(key, &json)
}

/// Read the legacy expense collection under `key`, empty if never written
pub fn load_legacy<S: KeyValueStorage + ?Sized>(
    storage: &S,
    key: &str,
) -> Result<Vec<LegacyExpense>> {
    match storage.get_item(key)? {
        Some(raw) => {
            let envelope: Envelope<LegacyState> = serde_json::from_str(&raw)?;
            Ok(envelope.state.expenses)
        }
        None => Ok(Vec::new()),
    }
}
