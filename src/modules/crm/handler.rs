use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::core::projections::apply;
use crate::modules::crm::core::state::{Building, InternetPackage, Subscriber};
use crate::modules::crm::use_cases::delete_subscriber::{DeleteSubscriber, decide_delete_subscriber};
use crate::modules::crm::use_cases::import_subscribers::{
    ImportReport, ImportSubscribers, decide_import,
};
use crate::modules::crm::use_cases::maintain_subscriber::{
    RegisterSubscriber, UpdateSubscriber, decide_register_subscriber, decide_update_subscriber,
};
use crate::modules::crm::use_cases::reference_data::{
    AddBuilding, AddPackage, decide_add_building, decide_add_package,
};
use crate::modules::crm::use_cases::subscriber_queries::search_subscribers;
use crate::modules::crm::use_cases::subscriber_status::{
    CycleSubscriberStatus, SetSubscriberStatus, decide_cycle_status, decide_set_status,
};
use crate::shared::application::command_runner::CommandRunner;
use crate::shared::application::errors::ApplicationError;

pub struct CrmHandler {
    runner: CommandRunner,
}

impl CrmHandler {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    pub async fn register(&self, command: RegisterSubscriber) -> Result<Subscriber, ApplicationError> {
        let events = self
            .runner
            .run(
                "register_subscriber",
                |state, stamp| decide_register_subscriber(state, command, stamp),
                apply,
            )
            .await?;
        first_subscriber(events)
    }

    pub async fn update(&self, command: UpdateSubscriber) -> Result<Subscriber, ApplicationError> {
        let events = self
            .runner
            .run(
                "update_subscriber",
                |state, _| decide_update_subscriber(state, command),
                apply,
            )
            .await?;
        first_subscriber(events)
    }

    pub async fn cycle_status(
        &self,
        command: CycleSubscriberStatus,
    ) -> Result<Subscriber, ApplicationError> {
        let events = self
            .runner
            .run(
                "cycle_subscriber_status",
                |state, _| decide_cycle_status(state, command),
                apply,
            )
            .await?;
        first_subscriber(events)
    }

    pub async fn set_status(
        &self,
        command: SetSubscriberStatus,
    ) -> Result<Subscriber, ApplicationError> {
        let events = self
            .runner
            .run(
                "set_subscriber_status",
                |state, _| decide_set_status(state, command),
                apply,
            )
            .await?;
        first_subscriber(events)
    }

    /// Returns the ids of the tickets removed along with the subscriber.
    pub async fn delete(&self, command: DeleteSubscriber) -> Result<Vec<String>, ApplicationError> {
        let events = self
            .runner
            .run(
                "delete_subscriber",
                |state, _| decide_delete_subscriber(state, command),
                apply,
            )
            .await?;
        Ok(events
            .into_iter()
            .flat_map(|event| match event {
                CrmEvent::SubscriberDeleted { ticket_ids, .. } => ticket_ids,
                _ => Vec::new(),
            })
            .collect())
    }

    pub async fn import(&self, command: ImportSubscribers) -> Result<ImportReport, ApplicationError> {
        let events = self
            .runner
            .run(
                "import_subscribers",
                |state, stamp| decide_import(state, command, stamp),
                apply,
            )
            .await?;
        let report = events
            .iter()
            .find_map(ImportReport::from_event)
            .unwrap_or_default();
        tracing::info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped,
            "subscribers imported"
        );
        Ok(report)
    }

    pub async fn add_building(&self, command: AddBuilding) -> Result<Building, ApplicationError> {
        let events = self
            .runner
            .run(
                "add_building",
                |state, stamp| decide_add_building(state, command, stamp),
                apply,
            )
            .await?;
        events
            .into_iter()
            .find_map(|event| match event {
                CrmEvent::BuildingAdded { building } => Some(building),
                _ => None,
            })
            .ok_or_else(|| ApplicationError::Domain("no building was recorded".into()))
    }

    pub async fn add_package(&self, command: AddPackage) -> Result<InternetPackage, ApplicationError> {
        let events = self
            .runner
            .run(
                "add_package",
                |state, stamp| decide_add_package(state, command, stamp),
                apply,
            )
            .await?;
        events
            .into_iter()
            .find_map(|event| match event {
                CrmEvent::PackageAdded { package } => Some(package),
                _ => None,
            })
            .ok_or_else(|| ApplicationError::Domain("no package was recorded".into()))
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Subscriber>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(search_subscribers(&snapshot.collections, term))
    }

    pub async fn buildings(&self) -> Result<Vec<Building>, ApplicationError> {
        Ok(self.runner.snapshot().await?.collections.buildings)
    }

    pub async fn packages(&self) -> Result<Vec<InternetPackage>, ApplicationError> {
        Ok(self.runner.snapshot().await?.collections.packages)
    }
}

fn first_subscriber(events: Vec<CrmEvent>) -> Result<Subscriber, ApplicationError> {
    events
        .iter()
        .find_map(CrmEvent::subscriber)
        .cloned()
        .ok_or_else(|| ApplicationError::Domain("no subscriber was recorded".into()))
}
