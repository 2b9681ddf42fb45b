pub mod disk;
pub mod memory;

use crate::core::cache::KeyValueCollection;
use disk::DiskCollection;
use fjall::Keyspace;
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// Hands out named collections, persisted on disk when possible.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens the on-disk keyspace under `data_path/cache`. If it cannot be
    /// opened every collection is kept in memory instead.
    pub fn open(data_path: &Path) -> Self {
        let cache_dir = data_path.join("cache");
        let keyspace = match fjall::Config::new(&cache_dir).open() {
            Ok(keyspace) => {
                debug!("Opened rate store at {}", cache_dir.display());
                Some(keyspace)
            }
            Err(e) => {
                warn!(error = %e, "Could not open rate store at {}", cache_dir.display());
                None
            }
        };

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace: None,
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    /// Returns the collection called `name`, creating it on first use. A
    /// collection keeps the backing it was created with.
    pub fn collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        if let Some(existing) = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(existing);
        }

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| self.create_collection(name, persist));
        Arc::clone(collection)
    }

    fn create_collection(&self, name: &str, persist: bool) -> Arc<dyn KeyValueCollection> {
        if persist {
            if let Some(keyspace) = &self.keyspace {
                match DiskCollection::open(keyspace, name) {
                    Ok(collection) => return Arc::new(collection),
                    Err(e) => warn!(error = %e, "Could not open collection {}", name),
                }
            }
            debug!("Keeping collection {} in memory", name);
        }
        Arc::new(MemoryCollection::new())
    }
}
