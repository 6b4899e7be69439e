use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::TicketStatus;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTicket {
    pub ticket_id: String,
    pub actor_id: String,
}

/// Admin purge of every Resolved ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushResolved {
    pub actor_id: String,
}

pub fn decide_delete_ticket(state: &Collections, command: DeleteTicket) -> Decision {
    try_delete_ticket(state, command).into()
}

fn try_delete_ticket(
    state: &Collections,
    command: DeleteTicket,
) -> Result<Vec<TicketEvent>, DecideError> {
    require_manager(state, &command.actor_id, "delete tickets")?;
    if state.ticket(&command.ticket_id).is_none() {
        return Err(DecideError::TicketNotFound(command.ticket_id));
    }
    Ok(vec![TicketEvent::TicketDeleted {
        ticket_id: command.ticket_id,
    }])
}

pub fn decide_flush_resolved(state: &Collections, command: FlushResolved) -> Decision {
    try_flush_resolved(state, command).into()
}

fn try_flush_resolved(
    state: &Collections,
    command: FlushResolved,
) -> Result<Vec<TicketEvent>, DecideError> {
    require_manager(state, &command.actor_id, "flush resolved tickets")?;
    Ok(state
        .tickets
        .iter()
        .filter(|ticket| ticket.status == TicketStatus::Resolved)
        .map(|ticket| TicketEvent::TicketDeleted {
            ticket_id: ticket.id.clone(),
        })
        .collect())
}

fn require_manager(
    state: &Collections,
    actor_id: &str,
    action: &'static str,
) -> Result<(), DecideError> {
    let actor = state
        .actor(actor_id)
        .ok_or_else(|| DecideError::UnknownActor(actor_id.to_string()))?;
    if !actor.is_manager() {
        return Err(DecideError::ManagerOnly(action));
    }
    Ok(())
}
