use crate::modules::crm::core::state::Subscriber;
use crate::modules::tickets::core::presence::Viewer;
use crate::modules::tickets::core::state::{Comment, Ticket, TicketPriority, TicketStatus};
use crate::shared::infrastructure::state_store::Collections;
use serde::Serialize;

pub const GUEST: &str = "Guest";
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub assigned_engineer_id: Option<String>,
    pub subscriber_id: Option<String>,
}

impl TicketFilter {
    fn matches(&self, ticket: &Ticket) -> bool {
        self.status.is_none_or(|status| ticket.status == status)
            && self.priority.is_none_or(|priority| ticket.priority == priority)
            && self
                .assigned_engineer_id
                .as_ref()
                .is_none_or(|id| ticket.assigned_engineer_id.as_ref() == Some(id))
            && self
                .subscriber_id
                .as_ref()
                .is_none_or(|id| ticket.subscriber_id.as_ref() == Some(id))
    }
}

/// A queue line: the ticket with the names it points at resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketRow {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub subscriber_name: String,
    pub engineer_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub row: TicketRow,
    pub subscriber: Option<Subscriber>,
    pub comments: Vec<Comment>,
    pub viewer: Option<Viewer>,
}

pub fn subscriber_name(state: &Collections, ticket: &Ticket) -> String {
    ticket
        .subscriber_id
        .as_deref()
        .and_then(|id| state.subscriber(id))
        .map(|subscriber| subscriber.name.clone())
        .unwrap_or_else(|| GUEST.to_string())
}

pub fn engineer_name(state: &Collections, ticket: &Ticket) -> String {
    ticket
        .assigned_engineer_id
        .as_deref()
        .and_then(|id| state.engineer(id))
        .map(|engineer| engineer.name.clone())
        .unwrap_or_else(|| UNASSIGNED.to_string())
}

fn row(state: &Collections, ticket: &Ticket) -> TicketRow {
    TicketRow {
        subscriber_name: subscriber_name(state, ticket),
        engineer_name: engineer_name(state, ticket),
        ticket: ticket.clone(),
    }
}

/// Matching tickets, newest first.
pub fn list_tickets(state: &Collections, filter: &TicketFilter) -> Vec<TicketRow> {
    let mut rows: Vec<TicketRow> = state
        .tickets
        .iter()
        .filter(|ticket| filter.matches(ticket))
        .map(|ticket| row(state, ticket))
        .collect();
    rows.sort_by(|a, b| b.ticket.created_at.cmp(&a.ticket.created_at));
    rows
}

/// The ticket with its subscriber and its comments in time order. The viewer is
/// left for the caller to fill from the presence board.
pub fn ticket_detail(state: &Collections, ticket_id: &str) -> Option<TicketDetail> {
    let ticket = state.ticket(ticket_id)?;
    let mut comments: Vec<Comment> = state
        .comments
        .iter()
        .filter(|comment| comment.ticket_id == ticket_id)
        .cloned()
        .collect();
    comments.sort_by_key(|comment| comment.timestamp);

    Some(TicketDetail {
        row: row(state, ticket),
        subscriber: ticket
            .subscriber_id
            .as_deref()
            .and_then(|id| state.subscriber(id))
            .cloned(),
        comments,
        viewer: None,
    })
}
