use tracing::{debug, info};

use crate::analytics::StatsReport;
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::models::{StoredCollection, TransactionId, TransactionInput};
use crate::palette::CategoryPalette;
use crate::persistence::{load_legacy, load_snapshot, save_snapshot, KeyValueStorage};
use crate::store::TransactionStore;

/// Transaction store with write-through persistence
///
/// # Lifecycle
///
/// 1. `open()` hydrates the store from storage, importing the legacy
///    expense-only collection once if the current collection is empty
/// 2. Every successful mutation writes the full collection back before it
///    becomes visible in memory
/// 3. If the write fails the in-memory store keeps its previous state
///
/// # Example
///
/// ```
/// use chrono::DateTime;
/// use finance_tracker::config::TrackerConfig;
/// use finance_tracker::models::{Category, TransactionInput};
/// use finance_tracker::persistence::MemoryStorage;
/// use finance_tracker::persistent_store::PersistentStore;
/// use rust_decimal_macros::dec;
///
/// let config = TrackerConfig::default();
/// let mut store = PersistentStore::open(MemoryStorage::new(), &config).unwrap();
///
/// let date = DateTime::parse_from_rfc3339("2024-01-15T10:00:00+01:00").unwrap();
/// store
///     .add(TransactionInput::expense(dec!(12.50), Category::Food, date))
///     .unwrap();
///
/// assert_eq!(store.store().total_expenses(), dec!(12.50));
/// assert_eq!(store.storage().write_count(), 1);
/// ```
pub struct PersistentStore<S: KeyValueStorage> {
    /// In-memory collection
    store: TransactionStore,
    /// Durable backend
    storage: S,
    transactions_key: String,
    legacy_migrated: bool,
    /// Months kept by `stats`, from `limits.monthly_buckets`
    month_limit: usize,
}

impl<S: KeyValueStorage> PersistentStore<S> {
    /// Hydrate from `storage` using the keys and limits in `config`
    ///
    /// The legacy collection is imported only when the current collection
    /// is empty and no earlier import was recorded. The result of the
    /// import is written back immediately, together with the flag.
    ///
    /// # Arguments
    ///
    /// * `storage` - Backend holding both collections
    /// * `config` - Storage keys, note length limit and month limit
    ///
    /// # Returns
    ///
    /// The hydrated store. Fails when a snapshot cannot be read or parsed,
    /// or when writing the migrated collection fails.
    pub fn open(mut storage: S, config: &TrackerConfig) -> Result<Self> {
        let transactions_key = config.storage.transactions_key.clone();
        let snapshot = load_snapshot(&storage, &transactions_key)?.unwrap_or_default();

        let mut legacy_migrated = snapshot.legacy_migrated;
        let mut collection = StoredCollection::Current(snapshot.transactions);

        if collection.is_empty() && !legacy_migrated {
            let legacy = load_legacy(&storage, &config.storage.legacy_key)?;
            if !legacy.is_empty() {
                info!(
                    "Migrating {} legacy expenses from '{}'",
                    legacy.len(),
                    config.storage.legacy_key
                );
                collection = StoredCollection::Legacy(legacy);
            }
            legacy_migrated = true;
        }

        let migrating = matches!(collection, StoredCollection::Legacy(_));
        let store = TransactionStore::from_transactions(collection.into_current())
            .with_max_note_chars(config.limits.max_note_chars);

        if migrating {
            save_snapshot(
                &mut storage,
                &transactions_key,
                store.transactions(),
                legacy_migrated,
            )?;
        }

        debug!("Opened store with {} transactions", store.len());

        Ok(Self {
            store,
            storage,
            transactions_key,
            legacy_migrated,
            month_limit: config.limits.monthly_buckets,
        })
    }

    /// Apply `mutate` to a copy of the store, persist the copy, then commit
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut TransactionStore) -> Result<T>,
        changed: impl FnOnce(&T) -> bool,
    ) -> Result<T> {
        let mut next = self.store.clone();
        let outcome = mutate(&mut next)?;

        if changed(&outcome) {
            save_snapshot(
                &mut self.storage,
                &self.transactions_key,
                next.transactions(),
                self.legacy_migrated,
            )?;
            self.store = next;
        }

        Ok(outcome)
    }

    /// Validate, insert and persist a new transaction
    pub fn add(&mut self, input: TransactionInput) -> Result<TransactionId> {
        self.commit(|store| store.add(input), |_| true)
    }

    /// Replace the transaction matching `id` and persist
    ///
    /// `Ok(false)` when the id is unknown; nothing is written then.
    pub fn update(&mut self, id: &TransactionId, input: TransactionInput) -> Result<bool> {
        self.commit(|store| store.update(id, input), |updated| *updated)
    }

    /// Remove the transaction matching `id` and persist
    ///
    /// `Ok(false)` when the id is unknown; nothing is written then.
    pub fn delete(&mut self, id: &TransactionId) -> Result<bool> {
        self.commit(|store| Ok(store.delete(id)), |deleted| *deleted)
    }

    /// Statistics for the current collection
    ///
    /// The monthly view keeps as many months as `limits.monthly_buckets`
    /// allowed when the store was opened.
    pub fn stats(&self, palette: &CategoryPalette) -> StatsReport {
        StatsReport::build(self.store.transactions(), palette, self.month_limit)
    }

    /// Read access to the in-memory store for queries
    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the legacy collection has been considered for import
    pub fn legacy_migrated(&self) -> bool {
        self.legacy_migrated
    }
}
