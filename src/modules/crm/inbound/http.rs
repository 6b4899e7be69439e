use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::modules::crm::core::state::AccountStatus;
use crate::modules::crm::use_cases::delete_subscriber::DeleteSubscriber;
use crate::modules::crm::use_cases::import_subscribers::ImportSubscribers;
use crate::modules::crm::use_cases::maintain_subscriber::{
    RegisterSubscriber, SubscriberDetails, UpdateSubscriber,
};
use crate::modules::crm::use_cases::reference_data::{AddBuilding, AddPackage};
use crate::modules::crm::use_cases::subscriber_status::{
    CycleSubscriberStatus, SetSubscriberStatus,
};
use crate::shared::application::errors::ApplicationError;
use crate::shell::http::{ActingEngineer, json_body};
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct SubscriberBody {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub building_name: String,
    #[serde(default)]
    pub unit_number: String,
    #[serde(default)]
    pub router_serial: String,
    #[serde(default)]
    pub plan: String,
    pub status: Option<AccountStatus>,
}

impl SubscriberBody {
    fn details(self) -> (SubscriberDetails, Option<AccountStatus>) {
        (
            SubscriberDetails {
                name: self.name,
                phone: self.phone,
                email: self.email,
                building_name: self.building_name,
                unit_number: self.unit_number,
                router_serial: self.router_serial,
                plan: self.plan,
            },
            self.status,
        )
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: AccountStatus,
}

#[derive(Serialize)]
pub struct DeleteSubscriberResponse {
    pub removed_tickets: Vec<String>,
}

#[derive(Deserialize)]
pub struct BuildingBody {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
pub struct PackageBody {
    pub name: String,
    #[serde(default)]
    pub speed: String,
}

pub async fn register(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    body: Result<Json<SubscriberBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let (details, _) = json_body(body)?.details();
    let subscriber = state
        .crm
        .register(RegisterSubscriber { actor_id, details })
        .await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApplicationError> {
    let term = params.q.unwrap_or_default();
    Ok(Json(state.crm.search(&term).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(subscriber_id): Path<String>,
    body: Result<Json<SubscriberBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let (details, status) = json_body(body)?.details();
    let subscriber = state
        .crm
        .update(UpdateSubscriber {
            actor_id,
            subscriber_id,
            details,
            status,
        })
        .await?;
    Ok(Json(subscriber))
}

pub async fn cycle_status(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(subscriber_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    let subscriber = state
        .crm
        .cycle_status(CycleSubscriberStatus {
            actor_id,
            subscriber_id,
        })
        .await?;
    Ok(Json(subscriber))
}

pub async fn set_status(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(subscriber_id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let subscriber = state
        .crm
        .set_status(SetSubscriberStatus {
            actor_id,
            subscriber_id,
            status: body.status,
        })
        .await?;
    Ok(Json(subscriber))
}

pub async fn delete(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    Path(subscriber_id): Path<String>,
) -> Result<impl IntoResponse, ApplicationError> {
    let removed_tickets = state
        .crm
        .delete(DeleteSubscriber {
            actor_id,
            subscriber_id,
        })
        .await?;
    Ok(Json(DeleteSubscriberResponse { removed_tickets }))
}

/// Body is the raw spreadsheet text.
pub async fn import(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    text: String,
) -> Result<impl IntoResponse, ApplicationError> {
    let report = state
        .crm
        .import(ImportSubscribers { actor_id, text })
        .await?;
    Ok(Json(report))
}

pub async fn list_buildings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.crm.buildings().await?))
}

pub async fn add_building(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    body: Result<Json<BuildingBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let building = state
        .crm
        .add_building(AddBuilding {
            actor_id,
            name: body.name,
            address: body.address,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(building)))
}

pub async fn list_packages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApplicationError> {
    Ok(Json(state.crm.packages().await?))
}

pub async fn add_package(
    State(state): State<AppState>,
    ActingEngineer(actor_id): ActingEngineer,
    body: Result<Json<PackageBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let body = json_body(body)?;
    let package = state
        .crm
        .add_package(AddPackage {
            actor_id,
            name: body.name,
            speed: body.speed,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(package)))
}
