pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod palette;
pub mod persistence;
pub mod persistent_store;
pub mod store;

use config::TrackerConfig;
use error::Result;
use persistence::{KeyValueStorage, MemoryStorage};
use persistent_store::PersistentStore;

/// Open the transaction store described by `config`
///
/// Uses file storage when a storage directory is configured, otherwise an
/// in-memory backend that is lost when the process exits.
pub fn open_store(config: &TrackerConfig) -> Result<PersistentStore<Box<dyn KeyValueStorage>>> {
    let storage: Box<dyn KeyValueStorage> = match config.file_storage() {
        Some(files) => Box::new(files),
        None => Box::new(MemoryStorage::new()),
    };
    PersistentStore::open(storage, config)
}
