use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::{AuthorType, Comment, SYSTEM_AUTHOR};
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTicket {
    pub ticket_id: String,
    pub actor_id: String,
}

/// Take ownership of an unassigned ticket without touching its status.
pub fn decide_claim(state: &Collections, command: ClaimTicket, stamp: &Stamp<'_>) -> Decision {
    try_claim(state, command, stamp).into()
}

fn try_claim(
    state: &Collections,
    command: ClaimTicket,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    let actor = state
        .actor(&command.actor_id)
        .ok_or_else(|| DecideError::UnknownActor(command.actor_id.clone()))?;
    let ticket = state
        .ticket(&command.ticket_id)
        .ok_or_else(|| DecideError::TicketNotFound(command.ticket_id.clone()))?;

    if let Some(owner) = &ticket.assigned_engineer_id {
        let engineer = state
            .engineer(owner)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| owner.clone());
        return Err(DecideError::AlreadyAssigned {
            ticket_id: ticket.id.clone(),
            engineer,
        });
    }

    let mut claimed = ticket.clone();
    claimed.assigned_engineer_id = Some(actor.engineer_id.clone());
    Ok(vec![TicketEvent::TicketClaimed {
        log: Comment {
            id: stamp.id("comm"),
            ticket_id: claimed.id.clone(),
            author_type: AuthorType::System,
            author_name: SYSTEM_AUTHOR.to_string(),
            message: format!("Ticket claimed by {}", actor.name),
            timestamp: stamp.now,
        },
        ticket: claimed,
    }])
}
