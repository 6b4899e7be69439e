use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::TicketStatus;
use crate::modules::tickets::use_cases::change_status::transition;
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkResolve {
    pub actor_id: String,
    pub ticket_ids: Vec<String>,
}

/// Resolve every listed ticket in one go. Any unknown id rejects the whole batch;
/// tickets already Resolved are left as they are.
pub fn decide_bulk_resolve(state: &Collections, command: BulkResolve, stamp: &Stamp<'_>) -> Decision {
    try_bulk_resolve(state, command, stamp).into()
}

fn try_bulk_resolve(
    state: &Collections,
    command: BulkResolve,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    let actor = state
        .actor(&command.actor_id)
        .ok_or_else(|| DecideError::UnknownActor(command.actor_id.clone()))?;

    let mut seen = Vec::with_capacity(command.ticket_ids.len());
    let mut events = Vec::new();
    for ticket_id in command.ticket_ids {
        if seen.contains(&ticket_id) {
            continue;
        }
        let ticket = state
            .ticket(&ticket_id)
            .ok_or_else(|| DecideError::TicketNotFound(ticket_id.clone()))?;
        if ticket.status != TicketStatus::Resolved {
            events.push(transition(ticket, TicketStatus::Resolved, None, &actor, stamp));
        }
        seen.push(ticket_id);
    }
    Ok(events)
}

#[cfg(test)]
mod bulk_resolve_decide_tests {
    use super::*;
    use crate::shared::core::primitives::SequentialIds;
    use crate::tests::fixtures::{NOW, roster_state, ticket};
    use rstest::{fixture, rstest};

    #[fixture]
    fn state() -> Collections {
        let mut state = roster_state();
        state.tickets.push(ticket("TKT-1", Some("sub-1")));
        state.tickets.push(ticket("TKT-2", None));
        let mut done = ticket("TKT-3", None);
        done.status = TicketStatus::Resolved;
        done.resolved_at = Some(NOW - 10);
        state.tickets.push(done);
        state
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[rstest]
    fn it_should_resolve_each_open_ticket_once(state: Collections) {
        let generator = SequentialIds::new();
        let decision = decide_bulk_resolve(
            &state,
            BulkResolve {
                actor_id: "eng-1".into(),
                ticket_ids: ids(&["TKT-1", "TKT-2", "TKT-1", "TKT-3"]),
            },
            &Stamp::new(NOW, &generator),
        );
        match decision {
            Decision::Accepted { events } => {
                assert_eq!(events.len(), 2);
                for event in &events {
                    let ticket = event.ticket().unwrap();
                    assert_eq!(ticket.status, TicketStatus::Resolved);
                    assert_eq!(ticket.resolved_at, Some(NOW));
                }
            }
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }

    #[rstest]
    fn it_should_reject_the_batch_on_an_unknown_ticket(state: Collections) {
        let generator = SequentialIds::new();
        let decision = decide_bulk_resolve(
            &state,
            BulkResolve {
                actor_id: "eng-1".into(),
                ticket_ids: ids(&["TKT-1", "TKT-404"]),
            },
            &Stamp::new(NOW, &generator),
        );
        assert!(matches!(
            decision,
            Decision::Rejected {
                reason: DecideError::TicketNotFound(_)
            }
        ));
    }
}
