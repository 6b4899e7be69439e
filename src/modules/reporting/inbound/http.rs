use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::modules::reporting::use_cases::ticket_report::TicketReportFilter;
use crate::shared::application::errors::ApplicationError;
use crate::shell::state::AppState;

pub async fn kpis(State(state): State<AppState>) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.reports.kpis().await?))
}

pub async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.reports.dashboard().await?))
}

pub async fn recurring(State(state): State<AppState>) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.reports.recurring_issues().await?))
}

pub async fn tickets(
    State(state): State<AppState>,
    Query(filter): Query<TicketReportFilter>,
) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.reports.tickets(&filter).await?))
}

pub async fn export_tickets(
    State(state): State<AppState>,
    Query(filter): Query<TicketReportFilter>,
) -> Result<impl IntoResponse, ApplicationError> {
    let csv = state.reports.tickets_csv(&filter).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ticket_report.csv\"",
            ),
        ],
        csv,
    ))
}
