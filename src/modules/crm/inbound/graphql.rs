use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::crm::core::state::{AccountStatus, Subscriber};
use crate::modules::crm::use_cases::import_subscribers::{ImportReport, ImportSubscribers};
use crate::modules::crm::use_cases::maintain_subscriber::{
    RegisterSubscriber, SubscriberDetails, UpdateSubscriber,
};
use crate::modules::crm::use_cases::subscriber_status::CycleSubscriberStatus;
use crate::shared::application::errors::ApplicationError;
use crate::shell::graphql::{acting_engineer, gql_error};
use crate::shell::state::AppState;

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlSubscriber {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub building_name: String,
    pub unit_number: String,
    pub router_serial: String,
    pub plan: String,
    pub status: String,
}

impl From<Subscriber> for GqlSubscriber {
    fn from(s: Subscriber) -> Self {
        Self {
            id: s.id,
            name: s.name,
            phone: s.phone,
            email: s.email,
            building_name: s.building_name,
            unit_number: s.unit_number,
            router_serial: s.router_serial,
            plan: s.plan,
            status: s.status.as_str().to_string(),
        }
    }
}

#[derive(async_graphql::InputObject)]
pub struct GqlSubscriberInput {
    pub name: String,
    pub phone: String,
    #[graphql(default)]
    pub email: String,
    #[graphql(default)]
    pub building_name: String,
    #[graphql(default)]
    pub unit_number: String,
    #[graphql(default)]
    pub router_serial: String,
    #[graphql(default)]
    pub plan: String,
}

impl From<GqlSubscriberInput> for SubscriberDetails {
    fn from(input: GqlSubscriberInput) -> Self {
        Self {
            name: input.name,
            phone: input.phone,
            email: input.email,
            building_name: input.building_name,
            unit_number: input.unit_number,
            router_serial: input.router_serial,
            plan: input.plan,
        }
    }
}

#[derive(async_graphql::SimpleObject)]
pub struct GqlImportReport {
    pub created: i32,
    pub updated: i32,
    pub skipped: i32,
    pub log: Vec<String>,
}

impl From<ImportReport> for GqlImportReport {
    fn from(report: ImportReport) -> Self {
        let count = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
        Self {
            created: count(report.created),
            updated: count(report.updated),
            skipped: count(report.skipped),
            log: report.log,
        }
    }
}

#[derive(Default)]
pub struct CrmQuery;

#[Object]
impl CrmQuery {
    async fn subscribers(&self, context: &Context<'_>, search: Option<String>) -> GqlResult<Vec<GqlSubscriber>> {
        let state = context.data_unchecked::<AppState>();
        let found = state
            .crm
            .search(search.as_deref().unwrap_or_default())
            .await
            .map_err(gql_error)?;
        Ok(found.into_iter().map(Into::into).collect())
    }
}

#[derive(Default)]
pub struct CrmMutation;

#[Object]
impl CrmMutation {
    async fn register_subscriber(
        &self,
        context: &Context<'_>,
        input: GqlSubscriberInput,
    ) -> GqlResult<GqlSubscriber> {
        let state = context.data_unchecked::<AppState>();
        let subscriber = state
            .crm
            .register(RegisterSubscriber {
                actor_id: acting_engineer(context)?,
                details: input.into(),
            })
            .await
            .map_err(gql_error)?;
        Ok(subscriber.into())
    }

    /// Whole-record replace. `status` takes the display label and defaults to the current one.
    async fn update_subscriber(
        &self,
        context: &Context<'_>,
        id: String,
        input: GqlSubscriberInput,
        status: Option<String>,
    ) -> GqlResult<GqlSubscriber> {
        let state = context.data_unchecked::<AppState>();
        let status = status
            .as_deref()
            .map(str::parse::<AccountStatus>)
            .transpose()
            .map_err(|reason| gql_error(ApplicationError::Validation(reason)))?;
        let subscriber = state
            .crm
            .update(UpdateSubscriber {
                actor_id: acting_engineer(context)?,
                subscriber_id: id,
                details: input.into(),
                status,
            })
            .await
            .map_err(gql_error)?;
        Ok(subscriber.into())
    }

    async fn cycle_subscriber_status(&self, context: &Context<'_>, id: String) -> GqlResult<GqlSubscriber> {
        let state = context.data_unchecked::<AppState>();
        let subscriber = state
            .crm
            .cycle_status(CycleSubscriberStatus {
                actor_id: acting_engineer(context)?,
                subscriber_id: id,
            })
            .await
            .map_err(gql_error)?;
        Ok(subscriber.into())
    }

    /// `text` is the CSV file content, header line included.
    async fn import_subscribers(&self, context: &Context<'_>, text: String) -> GqlResult<GqlImportReport> {
        let state = context.data_unchecked::<AppState>();
        let report = state
            .crm
            .import(ImportSubscribers {
                actor_id: acting_engineer(context)?,
                text,
            })
            .await
            .map_err(gql_error)?;
        Ok(report.into())
    }
}
