use crate::modules::tickets::core::events::TicketEvent;
use crate::modules::tickets::core::presence::{PresenceBoard, Viewer};
use crate::modules::tickets::core::projections::apply;
use crate::modules::tickets::core::state::{Comment, Ticket};
use crate::modules::tickets::use_cases::annotate_ticket::{
    AddComment, SetFollowUpNote, decide_add_comment, decide_set_follow_up_note,
};
use crate::modules::tickets::use_cases::bulk_resolve::{BulkResolve, decide_bulk_resolve};
use crate::modules::tickets::use_cases::change_status::{ChangeTicketStatus, decide_change_status};
use crate::modules::tickets::use_cases::claim_ticket::{ClaimTicket, decide_claim};
use crate::modules::tickets::use_cases::open_ticket::{
    OpenTicket, ReceiveWhatsAppMessage, decide_open_ticket, decide_receive_whatsapp,
};
use crate::modules::tickets::use_cases::remove_tickets::{
    DeleteTicket, FlushResolved, decide_delete_ticket, decide_flush_resolved,
};
use crate::modules::tickets::use_cases::ticket_queries::{
    TicketDetail, TicketFilter, TicketRow, list_tickets, ticket_detail,
};
use crate::shared::application::command_runner::CommandRunner;
use crate::shared::application::errors::ApplicationError;
use std::sync::Arc;

pub struct TicketsHandler {
    runner: CommandRunner,
    presence: Arc<PresenceBoard>,
}

impl TicketsHandler {
    pub fn new(runner: CommandRunner, presence: Arc<PresenceBoard>) -> Self {
        Self { runner, presence }
    }

    pub async fn open_ticket(&self, command: OpenTicket) -> Result<Ticket, ApplicationError> {
        let events = self
            .runner
            .run(
                "open_ticket",
                |state, stamp| decide_open_ticket(state, command, stamp),
                apply,
            )
            .await?;
        first_ticket(events)
    }

    pub async fn receive_whatsapp(
        &self,
        command: ReceiveWhatsAppMessage,
    ) -> Result<Ticket, ApplicationError> {
        let events = self
            .runner
            .run(
                "receive_whatsapp",
                |state, stamp| decide_receive_whatsapp(state, command, stamp),
                apply,
            )
            .await?;
        first_ticket(events)
    }

    pub async fn change_status(
        &self,
        command: ChangeTicketStatus,
    ) -> Result<Ticket, ApplicationError> {
        let events = self
            .runner
            .run(
                "change_ticket_status",
                |state, stamp| decide_change_status(state, command, stamp),
                apply,
            )
            .await?;
        first_ticket(events)
    }

    pub async fn claim(&self, command: ClaimTicket) -> Result<Ticket, ApplicationError> {
        let events = self
            .runner
            .run(
                "claim_ticket",
                |state, stamp| decide_claim(state, command, stamp),
                apply,
            )
            .await?;
        first_ticket(events)
    }

    pub async fn add_comment(&self, command: AddComment) -> Result<Comment, ApplicationError> {
        let events = self
            .runner
            .run(
                "add_comment",
                |state, stamp| decide_add_comment(state, command, stamp),
                apply,
            )
            .await?;
        events
            .into_iter()
            .find_map(|event| match event {
                TicketEvent::CommentAdded { comment } => Some(comment),
                _ => None,
            })
            .ok_or_else(|| ApplicationError::Domain("no comment was recorded".into()))
    }

    pub async fn set_follow_up_note(
        &self,
        command: SetFollowUpNote,
    ) -> Result<Ticket, ApplicationError> {
        let events = self
            .runner
            .run(
                "set_follow_up_note",
                |state, _| decide_set_follow_up_note(state, command),
                apply,
            )
            .await?;
        first_ticket(events)
    }

    pub async fn bulk_resolve(&self, command: BulkResolve) -> Result<Vec<Ticket>, ApplicationError> {
        let events = self
            .runner
            .run(
                "bulk_resolve",
                |state, stamp| decide_bulk_resolve(state, command, stamp),
                apply,
            )
            .await?;
        Ok(events.iter().filter_map(TicketEvent::ticket).cloned().collect())
    }

    pub async fn delete(&self, command: DeleteTicket) -> Result<(), ApplicationError> {
        let ticket_id = command.ticket_id.clone();
        self.runner
            .run(
                "delete_ticket",
                |state, _| decide_delete_ticket(state, command),
                apply,
            )
            .await?;
        self.presence.forget_ticket(&ticket_id).await;
        Ok(())
    }

    /// Returns how many tickets were removed.
    pub async fn flush_resolved(&self, command: FlushResolved) -> Result<usize, ApplicationError> {
        let events = self
            .runner
            .run(
                "flush_resolved",
                |state, _| decide_flush_resolved(state, command),
                apply,
            )
            .await?;
        for event in &events {
            if let TicketEvent::TicketDeleted { ticket_id } = event {
                self.presence.forget_ticket(ticket_id).await;
            }
        }
        Ok(events.len())
    }

    pub async fn list(&self, filter: &TicketFilter) -> Result<Vec<TicketRow>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(list_tickets(&snapshot.collections, filter))
    }

    pub async fn detail(&self, ticket_id: &str) -> Result<TicketDetail, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        let mut detail = ticket_detail(&snapshot.collections, ticket_id)
            .ok_or_else(|| ApplicationError::NotFound(format!("ticket '{ticket_id}'")))?;
        detail.viewer = self.presence.viewer_of(ticket_id).await;
        Ok(detail)
    }

    /// Mark the ticket as open in `actor_id`'s view. Returns whoever else had it
    /// open, so the caller can warn about a collision.
    pub async fn open_view(
        &self,
        ticket_id: &str,
        actor_id: &str,
    ) -> Result<Option<Viewer>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        let actor = snapshot
            .collections
            .actor(actor_id)
            .ok_or_else(|| ApplicationError::Unauthenticated(format!("unknown engineer '{actor_id}'")))?;
        if snapshot.collections.ticket(ticket_id).is_none() {
            return Err(ApplicationError::NotFound(format!("ticket '{ticket_id}'")));
        }
        let previous = self
            .presence
            .viewer_of(ticket_id)
            .await
            .filter(|viewer| viewer.engineer_id != actor.engineer_id);
        self.presence.open_view(ticket_id, &actor).await;
        tracing::debug!(ticket_id, engineer_id = %actor.engineer_id, "ticket view opened");
        Ok(previous)
    }

    pub async fn close_view(&self, ticket_id: &str, actor_id: &str) -> bool {
        self.presence.close_view(ticket_id, actor_id).await
    }
}

fn first_ticket(events: Vec<TicketEvent>) -> Result<Ticket, ApplicationError> {
    events
        .iter()
        .find_map(TicketEvent::ticket)
        .cloned()
        .ok_or_else(|| ApplicationError::Domain("no ticket was recorded".into()))
}
