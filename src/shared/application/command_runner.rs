// Load -> decide -> project -> commit, shared by every context handler.
//
// Responsibilities
// - Read one consistent snapshot and hand it to a pure decide function.
// - Translate accepted events into store mutations with the context's projection.
// - Commit all mutations of the command at once against the snapshot version.
// - Runners cloned from one another share a write lock held from load to commit,
//   so commands in this process never race each other for the store version.

use crate::shared::application::errors::ApplicationError;
use crate::shared::core::decision::Decision;
use crate::shared::core::primitives::{Clock, EpochMillis, IdGenerator, Stamp};
use crate::shared::infrastructure::state_store::{Collections, Mutation, Snapshot, StateStore};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CommandRunner {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    write_lock: Arc<Mutex<()>>,
}

impl CommandRunner {
    pub fn new(
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn now(&self) -> EpochMillis {
        self.clock.now()
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ApplicationError> {
        Ok(self.store.load().await?)
    }

    pub async fn run<E, R, D>(
        &self,
        command: &'static str,
        decide: D,
        project: fn(&E) -> Vec<Mutation>,
    ) -> Result<Vec<E>, ApplicationError>
    where
        E: Send,
        R: Into<ApplicationError> + Display,
        D: FnOnce(&Collections, &Stamp<'_>) -> Decision<E, R> + Send,
    {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.store.load().await?;
        let decision = {
            let stamp = Stamp::new(self.clock.now(), self.ids.as_ref());
            decide(&snapshot.collections, &stamp)
        };

        match decision {
            Decision::Accepted { events } => {
                let mutations: Vec<Mutation> = events.iter().flat_map(project).collect();
                let mutation_count = mutations.len();
                let version = self.store.commit(snapshot.version, mutations).await?;
                tracing::info!(
                    command,
                    events = events.len(),
                    mutations = mutation_count,
                    version,
                    "command accepted"
                );
                Ok(events)
            }
            Decision::Rejected { reason } => {
                tracing::warn!(command, %reason, "command rejected");
                Err(reason.into())
            }
        }
    }
}
