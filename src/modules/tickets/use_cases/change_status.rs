use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::{
    AuthorType, Comment, SYSTEM_AUTHOR, Ticket, TicketStatus,
};
use crate::shared::core::actor::Actor;
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTicketStatus {
    pub ticket_id: String,
    pub actor_id: String,
    pub status: TicketStatus,
    /// Required, non-blank, when moving into Pending Site Visit.
    pub hardware_replacement: Option<String>,
}

pub fn decide_change_status(
    state: &Collections,
    command: ChangeTicketStatus,
    stamp: &Stamp<'_>,
) -> Decision {
    try_change_status(state, command, stamp).into()
}

fn try_change_status(
    state: &Collections,
    command: ChangeTicketStatus,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    let actor = state
        .actor(&command.actor_id)
        .ok_or_else(|| DecideError::UnknownActor(command.actor_id.clone()))?;
    let ticket = state
        .ticket(&command.ticket_id)
        .ok_or_else(|| DecideError::TicketNotFound(command.ticket_id.clone()))?;

    let hardware = match command.status {
        TicketStatus::PendingSiteVisit => Some(
            command
                .hardware_replacement
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .ok_or(DecideError::HardwareRequired)?
                .to_string(),
        ),
        _ => None,
    };

    Ok(vec![transition(ticket, command.status, hardware, &actor, stamp)])
}

/// Move one ticket to `to` on behalf of `actor`, logging the change.
///
/// An unassigned ticket becomes the actor's. Entering Resolved stamps
/// `resolved_at`, entering Pending Site Visit records the hardware.
pub(crate) fn transition(
    ticket: &Ticket,
    to: TicketStatus,
    hardware: Option<String>,
    actor: &Actor,
    stamp: &Stamp<'_>,
) -> TicketEvent {
    let from = ticket.status;
    let mut next = ticket.clone();
    next.status = to;
    if next.assigned_engineer_id.is_none() {
        next.assigned_engineer_id = Some(actor.engineer_id.clone());
    }
    if to == TicketStatus::Resolved {
        next.resolved_at = Some(stamp.now.max(ticket.created_at));
    }

    let mut message = format!("Status changed from {from} to {to} by {}", actor.name);
    if let Some(hardware) = hardware {
        message.push_str(&format!(". Hardware to replace: {hardware}"));
        next.hardware_replacement = Some(hardware);
    }

    TicketEvent::TicketStatusChanged {
        log: Comment {
            id: stamp.id("comm"),
            ticket_id: next.id.clone(),
            author_type: AuthorType::System,
            author_name: SYSTEM_AUTHOR.to_string(),
            message,
            timestamp: stamp.now,
        },
        ticket: next,
        from,
    }
}
