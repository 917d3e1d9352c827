mod schema;
mod sqlite;

pub use self::sqlite::Sqlite;

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Where counters live.
///
/// The server owns consistency: concurrent writers to the same key are
/// serialized and the last write wins.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn load(&self, key: &str) -> anyhow::Result<Option<u32>>;
    async fn save(&self, key: String, value: u32) -> anyhow::Result<()>;
}

#[derive(Default, Debug)]
pub struct InMemoryStorage {
    counters: RwLock<HashMap<String, u32>>,
}

impl InMemoryStorage {
    pub fn with_counters<I, K>(counters: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            counters: RwLock::new(
                counters
                    .into_iter()
                    .map(|(key, value)| (key.into(), value))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn load(&self, key: &str) -> anyhow::Result<Option<u32>> {
        let counters = self.counters.read().await;

        Ok(counters.get(key).copied())
    }

    async fn save(&self, key: String, value: u32) -> anyhow::Result<()> {
        let mut counters = self.counters.write().await;
        counters.insert(key, value);

        Ok(())
    }
}
