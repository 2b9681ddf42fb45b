use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use tracing::debug;

/// A collection stored in one fjall partition. Every write is synced to disk
/// before `set` returns.
pub struct DiskCollection {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn open(keyspace: &Keyspace, name: &str) -> Result<Self> {
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        Ok(Self {
            keyspace: keyspace.clone(),
            partition,
        })
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &str) -> Option<String> {
        let res: Result<Option<String>> = (|| {
            if let Some(value) = self.partition.get(key)? {
                debug!("Store HIT for key: {}", key);
                return Ok(Some(String::from_utf8(value.to_vec())?));
            }
            debug!("Store MISS for key: {}", key);
            Ok(None)
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("DiskCollection get error: {}", e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Store PUT for key: {}", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_disk_get_set() {
        let dir = tempdir().unwrap();
        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = DiskCollection::open(&keyspace, "rates").unwrap();

        assert!(store.get("eurTryRate").await.is_none());

        store.set("eurTryRate", "48.5".to_string()).await.unwrap();
        assert_eq!(store.get("eurTryRate").await.as_deref(), Some("48.5"));
        assert!(store.get("eurTryRateTime").await.is_none());
    }

    #[tokio::test]
    async fn test_disk_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let keyspace = fjall::Config::new(dir.path()).open().unwrap();
            let store = DiskCollection::open(&keyspace, "rates").unwrap();
            store.set("eurTryRate", "47.25".to_string()).await.unwrap();
        }

        let keyspace = fjall::Config::new(dir.path()).open().unwrap();
        let store = DiskCollection::open(&keyspace, "rates").unwrap();
        assert_eq!(store.get("eurTryRate").await.as_deref(), Some("47.25"));
    }
}
