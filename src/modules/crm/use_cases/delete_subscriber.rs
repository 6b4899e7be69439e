use crate::modules::crm::core::decision::{DecideError, Decision};
use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::use_cases::maintain_subscriber::acting;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSubscriber {
    pub actor_id: String,
    pub subscriber_id: String,
}

/// Remove the subscriber together with every ticket that references it.
pub fn decide_delete_subscriber(state: &Collections, command: DeleteSubscriber) -> Decision {
    try_delete(state, command).into()
}

fn try_delete(state: &Collections, command: DeleteSubscriber) -> Result<Vec<CrmEvent>, DecideError> {
    let actor = acting(state, &command.actor_id)?;
    if !actor.is_manager() {
        return Err(DecideError::ManagerOnly("delete subscribers"));
    }
    if state.subscriber(&command.subscriber_id).is_none() {
        return Err(DecideError::SubscriberNotFound(command.subscriber_id));
    }
    let ticket_ids = state
        .tickets
        .iter()
        .filter(|ticket| ticket.subscriber_id.as_deref() == Some(command.subscriber_id.as_str()))
        .map(|ticket| ticket.id.clone())
        .collect();
    Ok(vec![CrmEvent::SubscriberDeleted {
        subscriber_id: command.subscriber_id,
        ticket_ids,
    }])
}

#[cfg(test)]
mod delete_subscriber_decide_tests {
    use super::*;
    use crate::modules::crm::core::projections::apply;
    use crate::shared::infrastructure::state_store::apply_mutations;
    use crate::tests::fixtures::{comment, roster_state, subscriber, ticket};
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> Collections {
        let mut state = roster_state();
        state.subscribers.push(subscriber("sub-2", "+60100000002"));
        state.tickets.extend([
            ticket("TKT-1", Some("sub-1")),
            ticket("TKT-2", Some("sub-2")),
            ticket("TKT-3", Some("sub-1")),
            ticket("TKT-4", None),
        ]);
        state.comments.extend([
            comment("c-1", "TKT-1"),
            comment("c-2", "TKT-2"),
            comment("c-3", "TKT-3"),
        ]);
        state
    }

    fn delete(actor_id: &str) -> DeleteSubscriber {
        DeleteSubscriber {
            actor_id: actor_id.into(),
            subscriber_id: "sub-1".into(),
        }
    }

    #[rstest]
    fn it_should_remove_exactly_the_subscribers_tickets(mut state: Collections) {
        let events = match decide_delete_subscriber(&state, delete("mgr-1")) {
            Decision::Accepted { events } => events,
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        };
        apply_mutations(&mut state, events.iter().flat_map(apply).collect());

        assert!(state.subscriber("sub-1").is_none());
        assert!(state.subscriber("sub-2").is_some());
        let remaining: Vec<&str> = state.tickets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(remaining, vec!["TKT-2", "TKT-4"]);
        let comments: Vec<&str> = state.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(comments, vec!["c-2"]);
    }

    #[rstest]
    fn it_should_forbid_engineers(state: Collections) {
        assert!(matches!(
            decide_delete_subscriber(&state, delete("eng-1")),
            Decision::Rejected {
                reason: DecideError::ManagerOnly(_)
            }
        ));
    }
}
