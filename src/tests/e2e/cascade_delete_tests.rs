use std::sync::Arc;

use uuid::Uuid;

use crate::modules::crm::use_cases::delete_subscriber::DeleteSubscriber;
use crate::modules::tickets::use_cases::annotate_ticket::AddComment;
use crate::shared::application::errors::ApplicationError;
use crate::shared::core::primitives::{FixedClock, SequentialIds};
use crate::shared::infrastructure::state_store::StateStore;
use crate::shared::infrastructure::state_store::json_file::JsonFileStateStore;
use crate::shell::config::Config;
use crate::shell::seed::seed_if_empty;
use crate::shell::state::AppState;
use crate::tests::fixtures::{NOW, app_state};

#[tokio::test]
async fn deleting_a_subscriber_removes_exactly_their_tickets() {
    let state = app_state();
    state
        .tickets
        .add_comment(AddComment {
            ticket_id: "TKT-1001".into(),
            actor_id: "eng-1".into(),
            message: "Replaced the patch cable".into(),
        })
        .await
        .unwrap();

    let removed = state
        .crm
        .delete(DeleteSubscriber {
            actor_id: "mgr-1".into(),
            subscriber_id: "sub-1".into(),
        })
        .await
        .unwrap();
    assert_eq!(removed, vec!["TKT-1001".to_string()]);

    let snapshot = state.store.load().await.unwrap();
    let collections = &snapshot.collections;
    assert!(collections.subscriber("sub-1").is_none());
    assert!(
        collections
            .tickets
            .iter()
            .all(|t| t.subscriber_id.as_deref() != Some("sub-1"))
    );
    assert!(collections.ticket("TKT-1002").is_some());
    assert!(collections.comments.iter().all(|c| c.ticket_id != "TKT-1001"));

    assert!(matches!(
        state.tickets.detail("TKT-1001").await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn the_cascade_survives_a_restart_of_the_file_store() {
    let path = std::env::temp_dir().join(format!("helpdesk-e2e-{}.json", Uuid::now_v7()));
    let config = Config::from_lookup(|_| None).unwrap();

    {
        let store = Arc::new(JsonFileStateStore::open(&path).await.unwrap());
        seed_if_empty(store.as_ref(), NOW).await.unwrap();
        let state = AppState::new(
            &config,
            store,
            Arc::new(FixedClock::at(NOW)),
            Arc::new(SequentialIds::new()),
        );
        state
            .crm
            .delete(DeleteSubscriber {
                actor_id: "mgr-1".into(),
                subscriber_id: "sub-2".into(),
            })
            .await
            .unwrap();
    }

    let reopened = JsonFileStateStore::open(&path).await.unwrap();
    let snapshot = reopened.load().await.unwrap();
    assert_eq!(snapshot.version, 2);
    assert!(snapshot.collections.subscriber("sub-2").is_none());
    assert!(snapshot.collections.ticket("TKT-1002").is_none());
    assert!(snapshot.collections.ticket("TKT-1001").is_some());

    let _ = tokio::fs::remove_file(&path).await;
}
