use crate::shared::infrastructure::state_store::{
    Mutation, Snapshot, StateStore, StoreError, next_snapshot,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryStateStore {
    inner: RwLock<Snapshot>,
    is_offline: bool,
    delay_commit_ms: AtomicU64,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Sleep between reading the version and writing, to widen race windows in tests.
    pub fn set_delay_commit_ms(&self, ms: u64) {
        self.delay_commit_ms.store(ms, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("State store offline".into()));
        }
        Ok(self.inner.read().await.clone())
    }

    async fn commit(
        &self,
        expected_version: i64,
        mutations: Vec<Mutation>,
    ) -> Result<i64, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("State store offline".into()));
        }
        let delay = self.delay_commit_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let mut guard = self.inner.write().await;
        let next = next_snapshot(&guard, expected_version, mutations)?;
        let version = next.version;
        *guard = next;
        Ok(version)
    }
}
