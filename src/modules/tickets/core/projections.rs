use crate::modules::tickets::core::events::TicketEvent;
use crate::shared::infrastructure::state_store::Mutation;

pub fn apply(event: &TicketEvent) -> Vec<Mutation> {
    match event {
        TicketEvent::TicketOpened { ticket } | TicketEvent::FollowUpNoteSet { ticket } => {
            vec![Mutation::UpsertTicket(ticket.clone())]
        }
        TicketEvent::TicketStatusChanged { ticket, log, .. }
        | TicketEvent::TicketClaimed { ticket, log } => vec![
            Mutation::UpsertTicket(ticket.clone()),
            Mutation::AppendComment(log.clone()),
        ],
        TicketEvent::CommentAdded { comment } => vec![Mutation::AppendComment(comment.clone())],
        TicketEvent::TicketDeleted { ticket_id } => vec![
            Mutation::RemoveTicket {
                ticket_id: ticket_id.clone(),
            },
            Mutation::RemoveCommentsForTicket {
                ticket_id: ticket_id.clone(),
            },
        ],
    }
}

#[cfg(test)]
mod ticket_projection_apply_tests {
    use super::*;
    use crate::tests::fixtures::{comment, ticket};
    use rstest::rstest;

    #[rstest]
    fn it_should_store_the_ticket_and_its_log_line() {
        let event = TicketEvent::TicketClaimed {
            ticket: ticket("TKT-1", None),
            log: comment("c-1", "TKT-1"),
        };
        let mutations = apply(&event);
        assert_eq!(mutations.len(), 2);
        assert!(matches!(&mutations[0], Mutation::UpsertTicket(t) if t.id == "TKT-1"));
        assert!(matches!(&mutations[1], Mutation::AppendComment(c) if c.id == "c-1"));
    }

    #[rstest]
    fn it_should_drop_comments_with_a_deleted_ticket() {
        let mutations = apply(&TicketEvent::TicketDeleted {
            ticket_id: "TKT-1".into(),
        });
        assert_eq!(
            mutations,
            vec![
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
