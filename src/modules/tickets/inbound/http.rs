use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::tickets::core::presence::Viewer;
use crate::modules::tickets::core::state::{TicketPriority, TicketStatus};
use crate::modules::tickets::use_cases::annotate_ticket::{AddComment, SetFollowUpNote};
use crate::modules::tickets::use_cases::bulk_resolve::BulkResolve;
use crate::modules::tickets::use_cases::change_status::ChangeTicketStatus;
use crate::modules::tickets::use_cases::claim_ticket::ClaimTicket;
use crate::modules::tickets::use_cases::open_ticket::{OpenTicket, ReceiveWhatsAppMessage};
use crate::modules::tickets::use_cases::remove_tickets::{DeleteTicket, FlushResolved};
use crate::modules::tickets::use_cases::ticket_queries::TicketFilter;
use crate::shared::application::errors::ApplicationError;
use crate::shell::http::{ActingEngineer, json_body};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct OpenTicketBody {
    pub subscriber_id: Option<String>,
    pub subject: String,
    pub description: String,
    pub priority: TicketPriority,
    pub assigned_engineer_id: Option<String>,
}

#[derive(Deserialize)]
pub struct WhatsAppBody {
    pub phone: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct ListTicketsParams {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub engineer_id: Option<String>,
    pub subscriber_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangeStatusBody {
    pub status: TicketStatus,
    pub hardware_replacement: Option<String>,
}

#[derive(Deserialize)]
pub struct CommentBody {
    pub message: String,
}

#[derive(Deserialize)]
pub struct FollowUpBody {
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkResolveBody {
    pub ticket_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct FlushResponse {
    pub removed: usize,
}

#[derive(Serialize)]
pub struct ViewResponse {
    pub also_viewing: Option<Viewer>,
}

pub async fn open(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    body: Result<Json<OpenTicketBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let ticket = state
        .tickets
        .open_ticket(OpenTicket {
            actor_id,
            subscriber_id: body.subscriber_id,
            subject: body.subject,
            description: body.description,
            priority: body.priority,
            assigned_engineer_id: body.assigned_engineer_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Intake hook for the messaging gateway; no engineer is involved.
pub async fn whatsapp(
    State(state): State<AppState>,
    body: Result<Json<WhatsAppBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let ticket = state
        .tickets
        .receive_whatsapp(ReceiveWhatsAppMessage {
            phone: body.phone,
            message: body.message,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListTicketsParams>,
) -> Result<impl IntoResponse, ApplicationError> {
    let filter = TicketFilter {
        status: params.status,
        priority: params.priority,
        assigned_engineer_id: params.engineer_id,
        subscriber_id: params.subscriber_id,
    };
    Ok(Json(state.tickets.list(&filter).await?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.tickets.detail(&ticket_id).await?))
}

pub async fn change_status(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
    body: Result<Json<ChangeStatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let ticket = state
        .tickets
        .change_status(ChangeTicketStatus {
            ticket_id,
            actor_id,
            status: body.status,
            hardware_replacement: body.hardware_replacement,
        })
        .await?;
    Ok(Json(ticket))
}

pub async fn claim(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    let ticket = state
        .tickets
        .claim(ClaimTicket {
            ticket_id,
            actor_id,
        })
        .await?;
    Ok(Json(ticket))
}

pub async fn add_comment(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let comment = state
        .tickets
        .add_comment(AddComment {
            ticket_id,
            actor_id,
            message: body.message,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn follow_up(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
    body: Result<Json<FollowUpBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let ticket = state
        .tickets
        .set_follow_up_note(SetFollowUpNote {
            ticket_id,
            actor_id,
            note: body.note,
        })
        .await?;
    Ok(Json(ticket))
}

pub async fn delete(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    state
        .tickets
        .delete(DeleteTicket {
            ticket_id,
            actor_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_resolve(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    body: Result<Json<BulkResolveBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let tickets = state
        .tickets
        .bulk_resolve(BulkResolve {
            actor_id,
            ticket_ids: body.ticket_ids,
        })
        .await?;
    Ok(Json(tickets))
}

pub async fn flush_resolved(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
) -> Result<impl IntoResponse, ApplicationError> {
    let removed = state
        .tickets
        .flush_resolved(FlushResolved { actor_id })
        .await?;
    Ok(Json(FlushResponse { removed }))
}

pub async fn open_view(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    let also_viewing = state.tickets.open_view(&ticket_id, &actor_id).await?;
    Ok(Json(ViewResponse { also_viewing }))
}

pub async fn close_view(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(ticket_id): Path<String>,
) -> impl IntoResponse {
    state.tickets.close_view(&ticket_id, &actor_id).await;
    StatusCode::NO_CONTENT
}
