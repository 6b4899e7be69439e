use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::{AuthorType, Comment};
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddComment {
    pub ticket_id: String,
    pub actor_id: String,
    pub message: String,
}

/// Handoff note for the next shift. A blank note clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetFollowUpNote {
    pub ticket_id: String,
    pub actor_id: String,
    pub note: Option<String>,
}

pub fn decide_add_comment(state: &Collections, command: AddComment, stamp: &Stamp<'_>) -> Decision {
    try_add_comment(state, command, stamp).into()
}

fn try_add_comment(
    state: &Collections,
    command: AddComment,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    let actor = state
        .actor(&command.actor_id)
        .ok_or_else(|| DecideError::UnknownActor(command.actor_id.clone()))?;
    if state.ticket(&command.ticket_id).is_none() {
        return Err(DecideError::TicketNotFound(command.ticket_id));
    }
    let message = command.message.trim();
    if message.is_empty() {
        return Err(DecideError::MissingField("message"));
    }

    Ok(vec![TicketEvent::CommentAdded {
        comment: Comment {
            id: stamp.id("comm"),
            ticket_id: command.ticket_id,
            author_type: AuthorType::Engineer,
            author_name: actor.name,
            message: message.to_string(),
            timestamp: stamp.now,
        },
    }])
}

pub fn decide_set_follow_up_note(state: &Collections, command: SetFollowUpNote) -> Decision {
    try_set_follow_up_note(state, command).into()
}

fn try_set_follow_up_note(
    state: &Collections,
    command: SetFollowUpNote,
) -> Result<Vec<TicketEvent>, DecideError> {
    if state.actor(&command.actor_id).is_none() {
        return Err(DecideError::UnknownActor(command.actor_id));
    }
    let mut ticket = state
        .ticket(&command.ticket_id)
        .cloned()
        .ok_or(DecideError::TicketNotFound(command.ticket_id))?;
    ticket.follow_up_note = command
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    Ok(vec![TicketEvent::FollowUpNoteSet { ticket }])
}
