use async_graphql::{Context, Json, Object, Result as GqlResult};

use crate::modules::reporting::core::kpis::{Dashboard, Kpis};
use crate::shell::graphql::gql_error;
use crate::shell::state::AppState;

/// Report shapes are passed through as JSON scalars.
#[derive(Default)]
pub struct ReportsQuery;

#[Object]
impl ReportsQuery {
    async fn kpis(&self, context: &Context<'_>) -> GqlResult<Json<Kpis>> {
        let state = context.data_unchecked::<AppState>();
        Ok(Json(state.reports.kpis().await.map_err(gql_error)?))
    }

    async fn dashboard(&self, context: &Context<'_>) -> GqlResult<Json<Dashboard>> {
        let state = context.data_unchecked::<AppState>();
        Ok(Json(state.reports.dashboard().await.map_err(gql_error)?))
    }
}
