use crate::modules::staff::core::events::StaffEvent;
use crate::modules::staff::core::projections::apply;
use crate::modules::staff::core::shift_policy::BusinessHours;
use crate::modules::staff::core::state::{AttendanceRecord, Engineer};
use crate::modules::staff::use_cases::attendance_queries::{
    AttendanceFilter, attendance_csv, list_attendance,
};
use crate::modules::staff::use_cases::shifts::{
    SignIn, SignOut, ToggleShift, decide_sign_in, decide_sign_out, decide_toggle_shift,
};
use crate::shared::application::command_runner::CommandRunner;
use crate::shared::application::errors::ApplicationError;

pub struct StaffHandler {
    runner: CommandRunner,
    shared_secret: String,
    hours: BusinessHours,
}

impl StaffHandler {
    pub fn new(runner: CommandRunner, shared_secret: impl Into<String>, hours: BusinessHours) -> Self {
        Self {
            runner,
            shared_secret: shared_secret.into(),
            hours,
        }
    }

    pub async fn sign_in(&self, command: SignIn) -> Result<Engineer, ApplicationError> {
        let events = self
            .runner
            .run(
                "sign_in",
                |state, stamp| decide_sign_in(state, command, &self.shared_secret, &self.hours, stamp),
                apply,
            )
            .await?;
        first_engineer(events)
    }

    /// Returns the closed session, if one was open.
    pub async fn sign_out(
        &self,
        command: SignOut,
    ) -> Result<Option<AttendanceRecord>, ApplicationError> {
        let events = self
            .runner
            .run(
                "sign_out",
                |state, stamp| decide_sign_out(state, command, &self.hours, stamp),
                apply,
            )
            .await?;
        Ok(events.iter().find_map(StaffEvent::attendance).cloned())
    }

    pub async fn toggle_shift(&self, command: ToggleShift) -> Result<Engineer, ApplicationError> {
        let events = self
            .runner
            .run(
                "toggle_shift",
                |state, _| decide_toggle_shift(state, command),
                apply,
            )
            .await?;
        first_engineer(events)
    }

    pub async fn engineers(&self) -> Result<Vec<Engineer>, ApplicationError> {
        Ok(self.runner.snapshot().await?.collections.engineers)
    }

    pub async fn attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> Result<Vec<AttendanceRecord>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(list_attendance(&snapshot.collections, filter))
    }

    pub async fn attendance_csv(&self, filter: &AttendanceFilter) -> Result<String, ApplicationError> {
        let records = self.attendance(filter).await?;
        Ok(attendance_csv(&records, self.runner.now(), self.hours.offset))
    }
}

fn first_engineer(events: Vec<StaffEvent>) -> Result<Engineer, ApplicationError> {
    events
        .first()
        .map(|event| event.engineer().clone())
        .ok_or_else(|| ApplicationError::Domain("no engineer was recorded".into()))
}
