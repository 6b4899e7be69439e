use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Json, Router,
    extract::{FromRequestParts, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::crm::inbound::http as crm_http;
use crate::modules::reporting::inbound::http as reporting_http;
use crate::modules::staff::inbound::http as staff_http;
use crate::modules::tickets::inbound::http as tickets_http;
use crate::shared::application::errors::ApplicationError;
use crate::shared::infrastructure::state_store::StoreError;
use crate::shell::graphql::{AppSchema, build_schema};
use crate::shell::state::AppState;

/// Header naming the engineer a request acts for.
pub const ENGINEER_HEADER: &str = "x-engineer-id";

/// The engineer id from [`ENGINEER_HEADER`]. Missing or blank is a 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingEngineer(pub String);

impl ActingEngineer {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(ENGINEER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| ActingEngineer(value.to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ActingEngineer {
    type Rejection = ApplicationError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or_else(|| {
            ApplicationError::Unauthenticated(format!("missing {ENGINEER_HEADER} header"))
        })
    }
}

/// Unwraps a JSON body, turning a malformed one into a 422.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApplicationError> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| ApplicationError::Validation(rejection.body_text()))
}

impl ApplicationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApplicationError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApplicationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationError::Domain(_) => StatusCode::CONFLICT,
            ApplicationError::Store(StoreError::VersionMismatch { .. }) => StatusCode::CONFLICT,
            ApplicationError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());

    Router::new()
        .route("/subscribers", post(crm_http::register).get(crm_http::search))
        .route("/subscribers/import", post(crm_http::import))
        .route(
            "/subscribers/{id}",
            put(crm_http::update).delete(crm_http::delete),
        )
        .route("/subscribers/{id}/status", put(crm_http::set_status))
        .route("/subscribers/{id}/cycle-status", post(crm_http::cycle_status))
        .route(
            "/buildings",
            get(crm_http::list_buildings).post(crm_http::add_building),
        )
        .route(
            "/packages",
            get(crm_http::list_packages).post(crm_http::add_package),
        )
        .route("/tickets", post(tickets_http::open).get(tickets_http::list))
        .route("/tickets/whatsapp", post(tickets_http::whatsapp))
        .route("/tickets/bulk-resolve", post(tickets_http::bulk_resolve))
        .route("/tickets/flush-resolved", post(tickets_http::flush_resolved))
        .route(
            "/tickets/{id}",
            get(tickets_http::detail).delete(tickets_http::delete),
        )
        .route("/tickets/{id}/status", post(tickets_http::change_status))
        .route("/tickets/{id}/claim", post(tickets_http::claim))
        .route("/tickets/{id}/comments", post(tickets_http::add_comment))
        .route("/tickets/{id}/follow-up", put(tickets_http::follow_up))
        .route(
            "/tickets/{id}/view",
            post(tickets_http::open_view).delete(tickets_http::close_view),
        )
        .route("/auth/sign-in", post(staff_http::sign_in))
        .route("/auth/sign-out", post(staff_http::sign_out))
        .route("/shift/toggle", post(staff_http::toggle_shift))
        .route("/engineers", get(staff_http::engineers))
        .route("/attendance", get(staff_http::attendance))
        .route("/attendance/export", get(staff_http::export_attendance))
        .route("/reports/kpis", get(reporting_http::kpis))
        .route("/reports/dashboard", get(reporting_http::dashboard))
        .route("/reports/recurring", get(reporting_http::recurring))
        .route("/reports/tickets", get(reporting_http::tickets))
        .route("/reports/tickets/export", get(reporting_http::export_tickets))
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// The acting engineer, when given, rides along as request data for resolvers.
async fn graphql(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(actor) = ActingEngineer::from_headers(&headers) {
        request = request.data(actor);
    }
    schema.execute(request).await.into()
}

async fn graphiql() -> Html<String> {
    use async_graphql::http::GraphiQLSource;
    Html(GraphiQLSource::build().endpoint("/gql").finish())
}
