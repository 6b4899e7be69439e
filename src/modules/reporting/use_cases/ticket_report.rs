use chrono::{Days, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::modules::tickets::core::state::{Ticket, TicketStatus};
use crate::modules::tickets::use_cases::ticket_queries::UNASSIGNED;
use crate::shared::application::errors::ApplicationError;
use crate::shared::core::csv::render_report;
use crate::shared::core::primitives::{EpochMillis, format_local, start_of_local_day};
use crate::shared::infrastructure::state_store::Collections;

pub const TICKET_REPORT_TITLE: &str = "ISP HELPDESK - ADVANCED ANALYTICS REPORT";

const HEADERS: [&str; 11] = [
    "Ticket ID",
    "Subscriber",
    "Building",
    "Unit",
    "Subject",
    "Status",
    "Priority",
    "Created At",
    "Resolved At",
    "Engineer",
    "Follow-up Note",
];

const NOT_AVAILABLE: &str = "N/A";

/// Blank strings count as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TicketReportFilter {
    /// Exact building name.
    pub building: Option<String>,
    /// Case-insensitive unit substring.
    pub unit: Option<String>,
    /// `YYYY-MM-DD`, local, inclusive.
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, local, inclusive to the end of that day.
    pub end_date: Option<String>,
    /// Case-insensitive match in subject or description.
    pub keyword: Option<String>,
    pub status: Option<TicketStatus>,
    pub engineer_id: Option<String>,
}

/// A report line with every reference resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub subscriber_name: String,
    pub building_name: String,
    pub unit_number: String,
    pub engineer_name: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_day(field: &str, value: &str) -> Result<NaiveDate, ApplicationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApplicationError::Validation(format!("{field} must be YYYY-MM-DD, got '{value}'")))
}

/// Created-at window as `[from, until)` epoch bounds.
struct Window {
    from: Option<EpochMillis>,
    until: Option<EpochMillis>,
}

impl Window {
    fn parse(filter: &TicketReportFilter, offset: FixedOffset) -> Result<Self, ApplicationError> {
        let from = present(&filter.start_date)
            .map(|value| parse_day("start_date", value))
            .transpose()?
            .map(|day| start_of_local_day(day, offset));
        let until = present(&filter.end_date)
            .map(|value| parse_day("end_date", value))
            .transpose()?
            .and_then(|day| day.checked_add_days(Days::new(1)))
            .map(|next| start_of_local_day(next, offset));
        Ok(Self { from, until })
    }

    fn contains(&self, at: EpochMillis) -> bool {
        self.from.is_none_or(|from| at >= from) && self.until.is_none_or(|until| at < until)
    }
}

pub fn ticket_report(
    state: &Collections,
    filter: &TicketReportFilter,
    offset: FixedOffset,
) -> Result<Vec<ReportRow>, ApplicationError> {
    let window = Window::parse(filter, offset)?;
    let building = present(&filter.building);
    let unit = present(&filter.unit).map(str::to_lowercase);
    let keyword = present(&filter.keyword).map(str::to_lowercase);
    let engineer_id = present(&filter.engineer_id);

    let mut rows = Vec::new();
    for ticket in &state.tickets {
        let subscriber = ticket
            .subscriber_id
            .as_deref()
            .and_then(|id| state.subscriber(id));

        if let Some(building) = building
            && subscriber.is_none_or(|s| s.building_name != building)
        {
            continue;
        }
        if let Some(unit) = unit.as_deref()
            && subscriber.is_none_or(|s| !s.unit_number.to_lowercase().contains(unit))
        {
            continue;
        }
        if !window.contains(ticket.created_at) {
            continue;
        }
        if let Some(keyword) = keyword.as_deref()
            && !ticket.subject.to_lowercase().contains(keyword)
            && !ticket.description.to_lowercase().contains(keyword)
        {
            continue;
        }
        if filter.status.is_some_and(|status| ticket.status != status) {
            continue;
        }
        if engineer_id.is_some_and(|id| ticket.assigned_engineer_id.as_deref() != Some(id)) {
            continue;
        }

        rows.push(ReportRow {
            subscriber_name: subscriber.map_or(NOT_AVAILABLE, |s| s.name.as_str()).to_string(),
            building_name: subscriber
                .map_or(NOT_AVAILABLE, |s| s.building_name.as_str())
                .to_string(),
            unit_number: subscriber
                .map_or(NOT_AVAILABLE, |s| s.unit_number.as_str())
                .to_string(),
            engineer_name: ticket
                .assigned_engineer_id
                .as_deref()
                .and_then(|id| state.engineer(id))
                .map_or(UNASSIGNED, |e| e.name.as_str())
                .to_string(),
            ticket: ticket.clone(),
        });
    }
    rows.sort_by(|a, b| b.ticket.created_at.cmp(&a.ticket.created_at));
    Ok(rows)
}

pub fn ticket_report_csv(rows: &[ReportRow], generated_at: EpochMillis, offset: FixedOffset) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let ticket = &row.ticket;
            vec![
                ticket.id.clone(),
                row.subscriber_name.clone(),
                row.building_name.clone(),
                row.unit_number.clone(),
                ticket.subject.clone(),
                ticket.status.to_string(),
                ticket.priority.to_string(),
                format_local(ticket.created_at, offset),
                ticket
                    .resolved_at
                    .map_or_else(|| NOT_AVAILABLE.to_string(), |at| format_local(at, offset)),
                row.engineer_name.clone(),
                ticket
                    .follow_up_note
                    .clone()
                    .unwrap_or_else(|| "None".to_string()),
            ]
        })
        .collect();
    render_report(
        TICKET_REPORT_TITLE,
        &format_local(generated_at, offset),
        &HEADERS,
        &body,
    )
}
