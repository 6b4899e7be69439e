use crate::modules::crm::core::decision::{DecideError, Decision};
use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::core::state::{AccountStatus, Subscriber};
use crate::modules::crm::use_cases::maintain_subscriber::{acting, may_set_status};
use crate::shared::infrastructure::state_store::Collections;

/// One step along Active -> Suspended -> Unsubscribed -> Active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSubscriberStatus {
    pub actor_id: String,
    pub subscriber_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSubscriberStatus {
    pub actor_id: String,
    pub subscriber_id: String,
    pub status: AccountStatus,
}

pub fn decide_cycle_status(state: &Collections, command: CycleSubscriberStatus) -> Decision {
    try_cycle(state, command).into()
}

fn try_cycle(
    state: &Collections,
    command: CycleSubscriberStatus,
) -> Result<Vec<CrmEvent>, DecideError> {
    let actor = acting(state, &command.actor_id)?;
    let current = state
        .subscriber(&command.subscriber_id)
        .ok_or_else(|| DecideError::SubscriberNotFound(command.subscriber_id.clone()))?;
    let next = current.status.next_in_cycle(actor.role);
    Ok(vec![status_changed(current, next)])
}

pub fn decide_set_status(state: &Collections, command: SetSubscriberStatus) -> Decision {
    try_set(state, command).into()
}

fn try_set(state: &Collections, command: SetSubscriberStatus) -> Result<Vec<CrmEvent>, DecideError> {
    let actor = acting(state, &command.actor_id)?;
    let current = state
        .subscriber(&command.subscriber_id)
        .ok_or_else(|| DecideError::SubscriberNotFound(command.subscriber_id.clone()))?;
    may_set_status(&actor, command.status)?;
    Ok(vec![status_changed(current, command.status)])
}

fn status_changed(current: &Subscriber, next: AccountStatus) -> CrmEvent {
    let mut subscriber = current.clone();
    subscriber.status = next;
    CrmEvent::SubscriberStatusChanged {
        subscriber,
        from: current.status,
    }
}

#[cfg(test)]
mod subscriber_status_decide_tests {
    use super::*;
    use crate::modules::crm::core::projections::apply;
    use crate::shared::infrastructure::state_store::apply_mutations;
    use crate::tests::fixtures::roster_state;
    use rstest::rstest;

    fn cycle_once(state: &mut Collections, actor_id: &str) -> AccountStatus {
        let decision = decide_cycle_status(
            state,
            CycleSubscriberStatus {
                actor_id: actor_id.into(),
                subscriber_id: "sub-1".into(),
            },
        );
        match decision {
            Decision::Accepted { events } => {
                let status = events[0].subscriber().unwrap().status;
                apply_mutations(state, events.iter().flat_map(apply).collect());
                status
            }
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }

    #[rstest]
    fn a_manager_cycling_three_times_from_active_should_land_on_active() {
        let mut state = roster_state();
        assert_eq!(state.subscribers[0].status, AccountStatus::Active);
        let stops: Vec<AccountStatus> = (0..3).map(|_| cycle_once(&mut state, "mgr-1")).collect();
        assert_eq!(
            stops,
            vec![
                AccountStatus::Suspended,
                AccountStatus::Unsubscribed,
                AccountStatus::Active
            ]
        );
    }

    #[rstest]
    fn an_engineer_cycle_should_never_produce_unsubscribed() {
        let mut state = roster_state();
        for _ in 0..6 {
            assert_ne!(cycle_once(&mut state, "eng-1"), AccountStatus::Unsubscribed);
        }
    }

    #[rstest]
    fn only_managers_may_set_unsubscribed() {
        let state = roster_state();
        let command = |actor_id: &str| SetSubscriberStatus {
            actor_id: actor_id.into(),
            subscriber_id: "sub-1".into(),
            status: AccountStatus::Unsubscribed,
        };
        assert!(matches!(
            decide_set_status(&state, command("eng-1")),
            Decision::Rejected {
                reason: DecideError::ManagerOnly(_)
            }
        ));
        assert!(decide_set_status(&state, command("mgr-1")).is_accepted());
    }

    #[rstest]
    fn it_should_report_an_unknown_subscriber() {
        let decision = decide_set_status(
            &roster_state(),
            SetSubscriberStatus {
                actor_id: "mgr-1".into(),
                subscriber_id: "sub-404".into(),
                status: AccountStatus::Suspended,
            },
        );
        assert!(matches!(
            decision,
            Decision::Rejected {
                reason: DecideError::SubscriberNotFound(_)
            }
        ));
    }
}
