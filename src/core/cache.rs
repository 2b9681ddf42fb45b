use anyhow::Result;
use async_trait::async_trait;

/// A string key-value collection the rate cache persists into.
///
/// Reads never fail: an unreadable entry is the same as a missing one.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String) -> Result<()>;
}
