//! Shared application state injected into handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::content::MarkdownFetcher;
use crate::Config;

/// Time of the most recent accepted push to a tracked branch.
///
/// Starts at the Unix epoch, meaning "never updated". Readers share the
/// lock; a writer holds it only for the assignment.
#[derive(Clone, Default)]
pub struct LastUpdate {
    inner: Arc<RwLock<DateTime<Utc>>>,
}

impl LastUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub async fn get(&self) -> DateTime<Utc> {
        *self.inner.read().await
    }

    /// Overwrite with the current UTC time and return the stored value.
    pub async fn touch(&self) -> DateTime<Utc> {
        let mut guard = self.inner.write().await;
        let now = Utc::now();
        *guard = now;
        now
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: MarkdownFetcher,
    pub last_update: LastUpdate,
}

impl AppState {
    pub fn new(config: Config, fetcher: MarkdownFetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            last_update: LastUpdate::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initial_value_is_unset() {
        let last_update = LastUpdate::new();
        assert_eq!(last_update.get().await, DateTime::<Utc>::default());
        assert_eq!(last_update.get().await.timestamp(), 0);
    }

    #[tokio::test]
    async fn test_touch_records_current_time() {
        let last_update = LastUpdate::new();

        let before = Utc::now();
        let stored = last_update.touch().await;
        let after = Utc::now();

        assert!(stored >= before && stored <= after);
        assert_eq!(last_update.get().await, stored);
    }

    #[tokio::test]
    async fn test_clones_share_value() {
        let last_update = LastUpdate::new();
        let clone = last_update.clone();

        let stored = clone.touch().await;
        assert_eq!(last_update.get().await, stored);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_last_writer_wins() {
        let last_update = LastUpdate::new();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let last_update = last_update.clone();
                tokio::spawn(async move { last_update.touch().await })
            })
            .collect();

        let mut written = Vec::with_capacity(handles.len());
        for handle in handles {
            written.push(handle.await.unwrap());
        }

        let final_value = last_update.get().await;
        assert!(written.contains(&final_value));
    }
}
