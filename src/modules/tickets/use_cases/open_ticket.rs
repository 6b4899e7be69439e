use crate::modules::tickets::core::decision::{DecideError, Decision};
use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::state::{Channel, Ticket, TicketPriority, TicketStatus};
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

const WHATSAPP_SUBJECT_CHARS: usize = 30;

/// A ticket logged by an engineer at the desk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTicket {
    pub actor_id: String,
    pub subscriber_id: Option<String>,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub assigned_engineer_id: Option<String>,
}

/// An inbound WhatsApp message, matched to a subscriber by phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveWhatsAppMessage {
    pub phone: String,
    pub message: String,
}

pub fn decide_open_ticket(state: &Collections, command: OpenTicket, stamp: &Stamp<'_>) -> Decision {
    try_open_ticket(state, command, stamp).into()
}

fn try_open_ticket(
    state: &Collections,
    command: OpenTicket,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    if state.actor(&command.actor_id).is_none() {
        return Err(DecideError::UnknownActor(command.actor_id));
    }
    let subject = required(&command.subject, "subject")?;
    let description = required(&command.description, "description")?;
    let subscriber_id = non_blank(command.subscriber_id);
    if let Some(id) = &subscriber_id
        && state.subscriber(id).is_none()
    {
        return Err(DecideError::UnknownSubscriber(id.clone()));
    }
    let assigned_engineer_id = non_blank(command.assigned_engineer_id);
    if let Some(id) = &assigned_engineer_id
        && state.engineer(id).is_none()
    {
        return Err(DecideError::UnknownAssignee(id.clone()));
    }

    Ok(vec![TicketEvent::TicketOpened {
        ticket: Ticket {
            id: stamp.id("TKT"),
            subscriber_id,
            subject,
            description,
            priority: command.priority,
            status: TicketStatus::Open,
            assigned_engineer_id,
            channel: Channel::Manual,
            created_at: stamp.now,
            resolved_at: None,
            hardware_replacement: None,
            follow_up_note: None,
        },
    }])
}

pub fn decide_receive_whatsapp(
    state: &Collections,
    command: ReceiveWhatsAppMessage,
    stamp: &Stamp<'_>,
) -> Decision {
    try_receive_whatsapp(state, command, stamp).into()
}

fn try_receive_whatsapp(
    state: &Collections,
    command: ReceiveWhatsAppMessage,
    stamp: &Stamp<'_>,
) -> Result<Vec<TicketEvent>, DecideError> {
    let message = required(&command.message, "message")?;
    let subscriber_id = state
        .subscriber_by_phone(command.phone.trim())
        .map(|subscriber| subscriber.id.clone());
    let preview: String = message.chars().take(WHATSAPP_SUBJECT_CHARS).collect();

    Ok(vec![TicketEvent::TicketOpened {
        ticket: Ticket {
            id: stamp.id("TKT-WA"),
            subscriber_id,
            subject: format!("WhatsApp Inquiry: {preview}..."),
            description: message,
            priority: TicketPriority::Medium,
            status: TicketStatus::Open,
            assigned_engineer_id: None,
            channel: Channel::WhatsApp,
            created_at: stamp.now,
            resolved_at: None,
            hardware_replacement: None,
            follow_up_note: None,
        },
    }])
}

fn required(value: &str, field: &'static str) -> Result<String, DecideError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DecideError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod open_ticket_decide_tests {
    use super::*;
    use crate::shared::core::primitives::SequentialIds;
    use crate::tests::fixtures::{NOW, roster_state};
    use rstest::{fixture, rstest};

    #[fixture]
    fn command() -> OpenTicket {
        OpenTicket {
            actor_id: "eng-1".into(),
            subscriber_id: Some("sub-1".into()),
            subject: "No signal".into(),
            description: "Router lights are red".into(),
            priority: TicketPriority::High,
            assigned_engineer_id: None,
        }
    }

    fn opened(decision: Decision) -> Ticket {
        match decision {
            Decision::Accepted { mut events } => match events.remove(0) {
                TicketEvent::TicketOpened { ticket } => ticket,
                other => panic!("unexpected event {other:?}"),
            },
            Decision::Rejected { reason } => panic!("expected Accepted, got {reason}"),
        }
    }

    #[rstest]
    fn it_should_open_a_manual_ticket(command: OpenTicket) {
        let ids = SequentialIds::new();
        let ticket = opened(decide_open_ticket(
            &roster_state(),
            command,
            &Stamp::new(NOW, &ids),
        ));
        assert_eq!(ticket.id, "TKT-0001");
        assert_eq!(ticket.channel, Channel::Manual);
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.created_at, NOW);
        assert_eq!(ticket.resolved_at, None);
        assert_eq!(ticket.subscriber_id.as_deref(), Some("sub-1"));
    }

    #[rstest]
    fn it_should_accept_a_guest_ticket(mut command: OpenTicket) {
        let ids = SequentialIds::new();
        command.subscriber_id = Some(" ".into());
        let ticket = opened(decide_open_ticket(
            &roster_state(),
            command,
            &Stamp::new(NOW, &ids),
        ));
        assert_eq!(ticket.subscriber_id, None);
    }

    #[rstest]
    fn it_should_reject_dangling_references(mut command: OpenTicket) {
        let ids = SequentialIds::new();
        let stamp = Stamp::new(NOW, &ids);
        command.subscriber_id = Some("sub-404".into());
        assert!(matches!(
            decide_open_ticket(&roster_state(), command.clone(), &stamp),
            Decision::Rejected {
                reason: DecideError::UnknownSubscriber(_)
            }
        ));
        command.subscriber_id = None;
        command.assigned_engineer_id = Some("eng-404".into());
        assert!(matches!(
            decide_open_ticket(&roster_state(), command, &stamp),
            Decision::Rejected {
                reason: DecideError::UnknownAssignee(_)
            }
        ));
    }

    #[rstest]
    fn it_should_require_a_subject(mut command: OpenTicket) {
        let ids = SequentialIds::new();
        command.subject = "  ".into();
        assert!(matches!(
            decide_open_ticket(&roster_state(), command, &Stamp::new(NOW, &ids)),
            Decision::Rejected {
                reason: DecideError::MissingField("subject")
            }
        ));
    }

    #[rstest]
    fn it_should_match_whatsapp_messages_to_subscribers_by_phone() {
        let ids = SequentialIds::new();
        let state = roster_state();
        let phone = state.subscribers[0].phone.clone();
        let ticket = opened(decide_receive_whatsapp(
            &state,
            ReceiveWhatsAppMessage {
                phone,
                message: "My internet is down, please help ASAP".into(),
            },
            &Stamp::new(NOW, &ids),
        ));
        assert_eq!(ticket.subscriber_id.as_deref(), Some("sub-1"));
        assert_eq!(ticket.channel, Channel::WhatsApp);
        assert_eq!(ticket.priority, TicketPriority::Medium);
        assert_eq!(ticket.subject, "WhatsApp Inquiry: My internet is down, please he...");
        assert!(ticket.id.starts_with("TKT-WA-"));
    }

    #[rstest]
    fn it_should_open_whatsapp_tickets_for_unknown_numbers_as_guest() {
        let ids = SequentialIds::new();
        let ticket = opened(decide_receive_whatsapp(
            &roster_state(),
            ReceiveWhatsAppMessage {
                phone: "+999".into(),
                message: "hi".into(),
            },
            &Stamp::new(NOW, &ids),
        ));
        assert_eq!(ticket.subscriber_id, None);
        assert_eq!(ticket.subject, "WhatsApp Inquiry: hi...");
    }
}
