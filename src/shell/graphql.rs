use async_graphql::{Context, EmptySubscription, ErrorExtensions, MergedObject, Schema};

use crate::modules::crm::inbound::graphql::{CrmMutation, CrmQuery};
use crate::modules::reporting::inbound::graphql::ReportsQuery;
use crate::modules::tickets::inbound::graphql::{TicketsMutation, TicketsQuery};
use crate::shared::application::errors::ApplicationError;
use crate::shell::http::{ActingEngineer, ENGINEER_HEADER};
pub use crate::shell::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(TicketsQuery, CrmQuery, ReportsQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(TicketsMutation, CrmMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

/// Carries the HTTP status the same failure would get on the REST routes.
pub fn gql_error(error: ApplicationError) -> async_graphql::Error {
    let status = error.status_code().as_u16();
    async_graphql::Error::new(error.to_string()).extend_with(|_, extensions| {
        extensions.set("status", status);
    })
}

pub fn acting_engineer(context: &Context<'_>) -> async_graphql::Result<String> {
    context
        .data_opt::<ActingEngineer>()
        .map(|actor| actor.0.clone())
        .ok_or_else(|| {
            gql_error(ApplicationError::Unauthenticated(format!(
                "missing {ENGINEER_HEADER} header"
            )))
        })
}
