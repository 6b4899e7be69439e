// Who is looking at which ticket right now.
//
// Process-local only; it is never persisted and is not shared across instances.
// A ticket has at most one viewer, the most recent to open it.

use crate::shared::core::actor::Actor;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub engineer_id: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct PresenceBoard {
    viewing: RwLock<HashMap<String, Viewer>>,
}

impl PresenceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open_view(&self, ticket_id: &str, actor: &Actor) {
        let viewer = Viewer {
            engineer_id: actor.engineer_id.clone(),
            name: actor.name.clone(),
        };
        self.viewing
            .write()
            .await
            .insert(ticket_id.to_string(), viewer);
    }

    /// Clears the entry only when `engineer_id` still holds it.
    pub async fn close_view(&self, ticket_id: &str, engineer_id: &str) -> bool {
        let mut viewing = self.viewing.write().await;
        let held = viewing
            .get(ticket_id)
            .is_some_and(|viewer| viewer.engineer_id == engineer_id);
        if held {
            viewing.remove(ticket_id);
        }
        held
    }

    pub async fn viewer_of(&self, ticket_id: &str) -> Option<Viewer> {
        self.viewing.read().await.get(ticket_id).cloned()
    }

    pub async fn forget_ticket(&self, ticket_id: &str) {
        self.viewing.write().await.remove(ticket_id);
    }
}

#[cfg(test)]
mod presence_board_tests {
    use super::*;
    use crate::shared::core::actor::Role;
    use rstest::{fixture, rstest};

    fn actor(id: &str, name: &str) -> Actor {
        Actor {
            engineer_id: id.into(),
            name: name.into(),
            role: Role::Engineer,
        }
    }

    #[fixture]
    fn board() -> PresenceBoard {
        PresenceBoard::new()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_show_the_latest_viewer(board: PresenceBoard) {
        board.open_view("TKT-1", &actor("eng-1", "Zack Wilson")).await;
        board.open_view("TKT-1", &actor("eng-2", "Sarah Chen")).await;
        let viewer = board.viewer_of("TKT-1").await.unwrap();
        assert_eq!(viewer.name, "Sarah Chen");
        assert_eq!(viewer.engineer_id, "eng-2");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_let_a_stale_viewer_clear_someone_else(board: PresenceBoard) {
        board.open_view("TKT-1", &actor("eng-1", "Zack Wilson")).await;
        board.open_view("TKT-1", &actor("eng-2", "Sarah Chen")).await;
        assert!(!board.close_view("TKT-1", "eng-1").await);
        assert!(board.viewer_of("TKT-1").await.is_some());
        assert!(board.close_view("TKT-1", "eng-2").await);
        assert!(board.viewer_of("TKT-1").await.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_forget_deleted_tickets(board: PresenceBoard) {
        board.open_view("TKT-1", &actor("eng-1", "Zack Wilson")).await;
        board.forget_ticket("TKT-1").await;
        assert!(board.viewer_of("TKT-1").await.is_none());
    }
}
