use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::debug;

use super::SessionData;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Expired records are reported as absent.
    async fn load(&self, id: &str) -> anyhow::Result<Option<SessionData>>;
    async fn save(&self, id: &str, data: SessionData) -> anyhow::Result<()>;
    /// Removing an unknown id is not an error.
    async fn destroy(&self, id: &str) -> anyhow::Result<()>;
}

/// Process-local session records. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn purge_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut map = self.inner.write().await;
        let before = map.len();
        map.retain(|_, data| data.expires_at > now);
        before - map.len()
    }

    /// Periodically drops expired records that were never looked up again.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let purged = self.purge_expired().await;
                if purged > 0 {
                    let remaining = self.len().await;
                    debug!(purged, remaining, "expired sessions purged");
                }
            }
        })
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> anyhow::Result<Option<SessionData>> {
        let found = self.inner.read().await.get(id).cloned();
        match found {
            Some(data) if data.is_expired() => {
                self.inner.write().await.remove(id);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn save(&self, id: &str, data: SessionData) -> anyhow::Result<()> {
        self.inner.write().await.insert(id.to_string(), data);
        Ok(())
    }

    async fn destroy(&self, id: &str) -> anyhow::Result<()> {
        self.inner.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use uuid::Uuid;

    fn record(expires_in: time::Duration) -> SessionData {
        let id = Uuid::new_v4();
        SessionData {
            user_id: id,
            user: SessionUser {
                id,
                name: "Ada".into(),
                email: "ada@blockful.io".into(),
                avatar: None,
            },
            expires_at: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn save_load_destroy() {
        let store = MemorySessionStore::default();
        let data = record(time::Duration::minutes(5));
        store.save("abc", data.clone()).await.unwrap();

        let loaded = store.load("abc").await.unwrap().expect("present");
        assert_eq!(loaded.user_id, data.user_id);

        store.destroy("abc").await.unwrap();
        assert!(store.load("abc").await.unwrap().is_none());
        // destroying twice is fine
        store.destroy("abc").await.unwrap();
    }

    #[tokio::test]
    async fn expired_records_are_absent_and_dropped() {
        let store = MemorySessionStore::default();
        store
            .save("old", record(time::Duration::seconds(-1)))
            .await
            .unwrap();
        assert!(store.load("old").await.unwrap().is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn purge_only_drops_expired() {
        let store = MemorySessionStore::default();
        store.save("old", record(time::Duration::seconds(-1))).await.unwrap();
        store.save("new", record(time::Duration::minutes(5))).await.unwrap();
        assert_eq!(store.purge_expired().await, 1);
        assert!(store.load("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sweeper_purges_in_background() {
        let store = Arc::new(MemorySessionStore::default());
        store.save("old", record(time::Duration::seconds(-1))).await.unwrap();
        store.save("new", record(time::Duration::minutes(5))).await.unwrap();

        let sweeper = store.clone().spawn_sweeper(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        sweeper.abort();

        assert_eq!(store.len().await, 1);
    }
}
