use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::tickets::core::state::{Comment, Ticket, TicketStatus};
use crate::modules::tickets::use_cases::annotate_ticket::AddComment;
use crate::modules::tickets::use_cases::change_status::ChangeTicketStatus;
use crate::modules::tickets::use_cases::claim_ticket::ClaimTicket;
use crate::modules::tickets::use_cases::ticket_queries::{TicketFilter, TicketRow};
use crate::shared::application::errors::ApplicationError;
use crate::shell::graphql::{acting_engineer, gql_error};
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlTicket {
    pub id: String,
    pub subscriber_id: Option<String>,
    pub subscriber_name: String,
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub assigned_engineer_id: Option<String>,
    pub engineer_name: String,
    pub created_at: i64,
    pub resolved_at: Option<i64>,
    pub hardware_replacement: Option<String>,
    pub follow_up_note: Option<String>,
}

impl From<TicketRow> for GqlTicket {
    fn from(row: TicketRow) -> Self {
        let mut ticket = GqlTicket::from(row.ticket);
        ticket.subscriber_name = row.subscriber_name;
        ticket.engineer_name = row.engineer_name;
        ticket
    }
}

impl From<Ticket> for GqlTicket {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id,
            subscriber_id: t.subscriber_id,
            subscriber_name: String::new(),
            subject: t.subject,
            description: t.description,
            priority: t.priority.to_string(),
            status: t.status.to_string(),
            assigned_engineer_id: t.assigned_engineer_id,
            engineer_name: String::new(),
            created_at: t.created_at,
            resolved_at: t.resolved_at,
            hardware_replacement: t.hardware_replacement,
            follow_up_note: t.follow_up_note,
        }
    }
}

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlComment {
    pub id: String,
    pub ticket_id: String,
    pub author_name: String,
    pub message: String,
    pub timestamp: i64,
}

impl From<Comment> for GqlComment {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            ticket_id: c.ticket_id,
            author_name: c.author_name,
            message: c.message,
            timestamp: c.timestamp,
        }
    }
}

fn parse_status(status: &str) -> GqlResult<TicketStatus> {
    status
        .parse()
        .map_err(|reason: String| gql_error(ApplicationError::Validation(reason)))
}

#[derive(Default)]
pub struct TicketsQuery;

#[Object]
impl TicketsQuery {
    /// Newest first. `status` takes the display label, e.g. "In-Progress".
    async fn tickets(&self, context: &Context<'_>, status: Option<String>) -> GqlResult<Vec<GqlTicket>> {
        let state = context.data_unchecked::<AppState>();
        let filter = TicketFilter {
            status: status.as_deref().map(parse_status).transpose()?,
            ..TicketFilter::default()
        };
        let rows = state.tickets.list(&filter).await.map_err(gql_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn ticket_comments(&self, context: &Context<'_>, ticket_id: String) -> GqlResult<Vec<GqlComment>> {
        let state = context.data_unchecked::<AppState>();
        let detail = state.tickets.detail(&ticket_id).await.map_err(gql_error)?;
        Ok(detail.comments.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct TicketsMutation;

#[Object]
impl TicketsMutation {
    async fn change_ticket_status(
        &self,
        context: &Context<'_>,
        ticket_id: String,
        status: String,
        hardware_replacement: Option<String>,
    ) -> GqlResult<GqlTicket> {
        let state = context.data_unchecked::<AppState>();
        let ticket = state
            .tickets
            .change_status(ChangeTicketStatus {
                ticket_id,
                actor_id: acting_engineer(context)?,
                status: parse_status(&status)?,
                hardware_replacement,
            })
            .await
            .map_err(gql_error)?;
        Ok(ticket.into())
    }

    async fn claim_ticket(&self, context: &Context<'_>, ticket_id: String) -> GqlResult<GqlTicket> {
        let state = context.data_unchecked::<AppState>();
        let ticket = state
            .tickets
            .claim(ClaimTicket {
                ticket_id,
                actor_id: acting_engineer(context)?,
            })
            .await
            .map_err(gql_error)?;
        Ok(ticket.into())
    }

    async fn add_comment(
        &self,
        context: &Context<'_>,
        ticket_id: String,
        message: String,
    ) -> GqlResult<GqlComment> {
        let state = context.data_unchecked::<AppState>();
        let comment = state
            .tickets
            .add_comment(AddComment {
                ticket_id,
                actor_id: acting_engineer(context)?,
                message,
            })
            .await
            .map_err(gql_error)?;
        Ok(comment.into())
    }
}
