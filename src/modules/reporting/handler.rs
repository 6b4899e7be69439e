use chrono::FixedOffset;

use crate::modules::reporting::core::kpis::{self, Dashboard, Kpis, RecurringIssue};
use crate::modules::reporting::use_cases::ticket_report::{
    ReportRow, TicketReportFilter, ticket_report, ticket_report_csv,
};
use crate::shared::application::command_runner::CommandRunner;
use crate::shared::application::errors::ApplicationError;

/// Read side only. Every call works on a fresh snapshot.
pub struct ReportsHandler {
    runner: CommandRunner,
    offset: FixedOffset,
}

impl ReportsHandler {
    pub fn new(runner: CommandRunner, offset: FixedOffset) -> Self {
        Self { runner, offset }
    }

    pub async fn kpis(&self) -> Result<Kpis, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(kpis::kpis(&snapshot.collections, self.runner.now(), self.offset))
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(kpis::dashboard(&snapshot.collections))
    }

    pub async fn recurring_issues(&self) -> Result<Vec<RecurringIssue>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        Ok(kpis::recurring_issues(&snapshot.collections))
    }

    pub async fn tickets(&self, filter: &TicketReportFilter) -> Result<Vec<ReportRow>, ApplicationError> {
        let snapshot = self.runner.snapshot().await?;
        ticket_report(&snapshot.collections, filter, self.offset)
    }

    pub async fn tickets_csv(&self, filter: &TicketReportFilter) -> Result<String, ApplicationError> {
        let rows = self.tickets(filter).await?;
        tracing::debug!(rows = rows.len(), "ticket report exported");
        Ok(ticket_report_csv(&rows, self.runner.now(), self.offset))
    }
}

#[cfg(test)]
mod reports_handler_tests {
    use super::*;
    use crate::shared::core::primitives::utc_offset;
    use crate::shared::infrastructure::state_store::in_memory::InMemoryStateStore;
    use crate::tests::fixtures::{roster_snapshot, runner_over, ticket};
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn before_each() -> ReportsHandler {
        let mut snapshot = roster_snapshot();
        snapshot.collections.tickets.push(ticket("TKT-1", Some("sub-1")));
        snapshot.collections.tickets.push(ticket("TKT-2", Some("sub-1")));
        let store = Arc::new(InMemoryStateStore::with_snapshot(snapshot));
        ReportsHandler::new(runner_over(store), utc_offset(0))
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_count_todays_tickets_in_the_trend(before_each: ReportsHandler) {
        let kpis = before_each.kpis().await.unwrap();
        assert_eq!(kpis.trend.last().unwrap().count, 2);
        assert_eq!(kpis.status_breakdown.open, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_flag_the_repeat_unit(before_each: ReportsHandler) {
        let issues = before_each.recurring_issues().await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].count, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_if_the_store_is_offline() {
        let mut store = InMemoryStateStore::with_snapshot(roster_snapshot());
        store.toggle_offline();
        let handler = ReportsHandler::new(runner_over(Arc::new(store)), utc_offset(0));
        assert!(matches!(handler.dashboard().await, Err(ApplicationError::Store(_))));
    }
}
