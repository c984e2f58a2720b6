pub mod key_value;

use crate::config::{StorageBackend, StorageConfig};
use key_value::{FileStore, KeyValueStore, MemoryStore};
use tracing::{info, warn};

pub fn open_store(config: &StorageConfig) -> Box<dyn KeyValueStore> {
    match config.backend {
        StorageBackend::File => {
            let store = FileStore::new(&config.path);
            info!(path = %store.path().display(), "session identity stored on disk");
            Box::new(store)
        }
        StorageBackend::Memory => {
            warn!("session identity kept in memory only; it is lost on restart");
            Box::new(MemoryStore::default())
        }
    }
}
