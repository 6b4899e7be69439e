// File backed state store.
//
// Responsibilities
// - Keep the current snapshot in memory for reads.
// - On commit, serialize the next snapshot to `<path>.tmp` and rename it over `<path>`
//   before publishing it in memory. A crash mid-write leaves the previous file intact.

use crate::shared::infrastructure::state_store::{
    Mutation, Snapshot, StateStore, StoreError, next_snapshot,
};
use std::path::PathBuf;
use tokio::sync::RwLock;

pub struct JsonFileStateStore {
    path: PathBuf,
    inner: RwLock<Snapshot>,
    is_offline: bool,
}

impl JsonFileStateStore {
    /// Open the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Snapshot>(&bytes).map_err(|e| {
                StoreError::Backend(format!("corrupt state file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "cannot read state file {}: {e}",
                    path.display()
                )));
            }
        };
        tracing::info!(
            path = %path.display(),
            version = snapshot.version,
            "state file opened"
        );
        Ok(Self {
            path,
            inner: RwLock::new(snapshot),
            is_offline: false,
        })
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    async fn write_atomically(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| StoreError::Backend(format!("cannot encode state: {e}")))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::Backend(format!("cannot write {}: {e}", tmp.display())))?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            StoreError::Backend(format!("cannot replace {}: {e}", self.path.display()))
        })
    }
}

#[async_trait::async_trait]
impl StateStore for JsonFileStateStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("State file offline".into()));
        }
        Ok(self.inner.read().await.clone())
    }

    async fn commit(
        &self,
        expected_version: i64,
        mutations: Vec<Mutation>,
    ) -> Result<i64, StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("State file offline".into()));
        }
        let mut guard = self.inner.write().await;
        let next = next_snapshot(&guard, expected_version, mutations)?;
        self.write_atomically(&next).await?;
        let version = next.version;
        *guard = next;
        Ok(version)
    }
}

#[cfg(test)]
mod json_file_state_store_tests {
    use super::*;
    use crate::tests::fixtures::{subscriber, ticket};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn state_path() -> PathBuf {
        std::env::temp_dir().join(format!("helpdesk-state-{}.json", Uuid::now_v7()))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_start_empty_when_the_file_is_missing(state_path: PathBuf) {
        let store = JsonFileStateStore::open(&state_path).await.unwrap();
        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.version, 0);
        assert!(snapshot.collections.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_survive_a_reopen(state_path: PathBuf) {
        let store = JsonFileStateStore::open(&state_path).await.unwrap();
        store
            .commit(
                0,
                vec![
                    Mutation::UpsertSubscriber(subscriber("sub-1", "+6011")),
                    Mutation::UpsertTicket(ticket("TKT-1", Some("sub-1"))),
                ],
            )
            .await
            .unwrap();
        drop(store);

        let reopened = JsonFileStateStore::open(&state_path).await.unwrap();
        let snapshot = reopened.load().await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.collections.subscribers.len(), 1);
        assert_eq!(snapshot.collections.tickets.len(), 1);

        let raw: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(&state_path).await.unwrap()).unwrap();
        assert_eq!(raw["isp_tickets"][0]["id"], "TKT-1");
        let _ = tokio::fs::remove_file(&state_path).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_corrupt_file(state_path: PathBuf) {
        tokio::fs::write(&state_path, b"not-json").await.unwrap();
        let result = JsonFileStateStore::open(&state_path).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        let _ = tokio::fs::remove_file(&state_path).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_leave_the_file_untouched_on_a_version_conflict(state_path: PathBuf) {
        let store = JsonFileStateStore::open(&state_path).await.unwrap();
        let result = store
            .commit(5, vec![Mutation::UpsertSubscriber(subscriber("sub-1", "+6011"))])
            .await;
        assert!(matches!(result, Err(StoreError::VersionMismatch { .. })));
        assert!(tokio::fs::metadata(&state_path).await.is_err());
    }
}
