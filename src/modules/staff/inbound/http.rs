use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::staff::core::state::AttendanceRecord;
use crate::modules::staff::use_cases::attendance_queries::AttendanceFilter;
use crate::modules::staff::use_cases::shifts::{SignIn, SignOut, ToggleShift};
use crate::shared::application::errors::ApplicationError;
use crate::shell::http::{ActingEngineer, json_body};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct SignInBody {
    pub engineer_id: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignOutResponse {
    pub session: Option<AttendanceRecord>,
}

pub async fn sign_in(
    State(state): State<AppState>,
    body: Result<Json<SignInBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let engineer = state
        .staff
        .sign_in(SignIn {
            engineer_id: body.engineer_id,
            secret: body.password,
        })
        .await?;
    Ok(Json(engineer))
}

pub async fn sign_out(
    State(state): State<AppState>,
    ActingEngineer(engineer_id): ActingEngineer,
) -> Result<impl IntoResponse, ApplicationError> {
    let session = state.staff.sign_out(SignOut { engineer_id }).await?;
    Ok(Json(SignOutResponse { session }))
}

pub async fn toggle_shift(
    State(state): State<AppState>,
    ActingEngineer(engineer_id): ActingEngineer,
) -> Result<impl IntoResponse, ApplicationError> {
    let engineer = state.staff.toggle_shift(ToggleShift { engineer_id }).await?;
    Ok(Json(engineer))
}

pub async fn engineers(State(state): State<AppState>) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.staff.engineers().await?))
}

pub async fn attendance(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.staff.attendance(&filter).await?))
}

pub async fn export_attendance(
    State(state): State<AppState>,
    Query(filter): Query<AttendanceFilter>,
) -> Result<impl IntoResponse, ApplicationError> {
    let csv = state.staff.attendance_csv(&filter).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"attendance.csv\"",
            ),
        ],
        csv,
    ))
}
