use crate::modules::crm::core::events::CrmEvent;
use crate::shared::infrastructure::state_store::Mutation;

pub fn apply(event: &CrmEvent) -> Vec<Mutation> {
    match event {
        CrmEvent::SubscriberRegistered { subscriber }
        | CrmEvent::SubscriberUpdated { subscriber }
        | CrmEvent::SubscriberStatusChanged { subscriber, .. } => {
            vec![Mutation::UpsertSubscriber(subscriber.clone())]
        }
        CrmEvent::SubscriberDeleted {
            subscriber_id,
            ticket_ids,
        } => {
            let mut mutations = vec![Mutation::RemoveSubscriber {
                subscriber_id: subscriber_id.clone(),
            }];
            for ticket_id in ticket_ids {
                mutations.push(Mutation::RemoveTicket {
                    ticket_id: ticket_id.clone(),
                });
                mutations.push(Mutation::RemoveCommentsForTicket {
                    ticket_id: ticket_id.clone(),
                });
            }
            mutations
        }
        CrmEvent::SubscribersImported {
            created, updated, ..
        } => created
            .iter()
            .chain(updated)
            .cloned()
            .map(Mutation::UpsertSubscriber)
            .collect(),
        CrmEvent::BuildingAdded { building } => vec![Mutation::UpsertBuilding(building.clone())],
        CrmEvent::PackageAdded { package } => vec![Mutation::UpsertPackage(package.clone())],
    }
}

#[cfg(test)]
mod crm_projection_apply_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_cascade_a_subscriber_delete_to_tickets_and_comments() {
        let mutations = apply(&CrmEvent::SubscriberDeleted {
            subscriber_id: "sub-1".into(),
            ticket_ids: vec!["TKT-1".into()],
        });
        assert_eq!(
            mutations,
            vec![
                Mutation::RemoveSubscriber {
                    subscriber_id: "sub-1".into()
                },
                Mutation::RemoveTicket {
                    ticket_id: "TKT-1".into()
                },
                Mutation::RemoveCommentsForTicket {
                    ticket_id: "TKT-1".into()
                },
            ]
        );
    }
}
