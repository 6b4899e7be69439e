use crate::modules::tickets::core::state::{Comment, Ticket, TicketStatus};

/// Facts recorded by the ticket context. Ticket payloads carry the whole record
/// after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketEvent {
    TicketOpened {
        ticket: Ticket,
    },
    TicketStatusChanged {
        ticket: Ticket,
        from: TicketStatus,
        log: Comment,
    },
    TicketClaimed {
        ticket: Ticket,
        log: Comment,
    },
    CommentAdded {
        comment: Comment,
    },
    FollowUpNoteSet {
        ticket: Ticket,
    },
    TicketDeleted {
        ticket_id: String,
    },
}

impl TicketEvent {
    pub fn ticket(&self) -> Option<&Ticket> {
        match self {
            TicketEvent::TicketOpened { ticket }
            | TicketEvent::TicketStatusChanged { ticket, .. }
            | TicketEvent::TicketClaimed { ticket, .. }
            | TicketEvent::FollowUpNoteSet { ticket } => Some(ticket),
            TicketEvent::CommentAdded { .. } | TicketEvent::TicketDeleted { .. } => None,
        }
    }
}
