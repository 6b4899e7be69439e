use chrono::FixedOffset;
use serde::Deserialize;

use crate::modules::staff::core::state::AttendanceRecord;
use crate::shared::core::csv::render_report;
use crate::shared::core::primitives::{EpochMillis, format_local};
use crate::shared::infrastructure::state_store::Collections;

pub const ATTENDANCE_REPORT_TITLE: &str = "ISP HELPDESK - ATTENDANCE & SHIFT LOG";

const HEADERS: [&str; 7] = [
    "Member",
    "Date",
    "Login Time",
    "Logout Time",
    "Total Duration (Min)",
    "Overtime (Min)",
    "Shift Status",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeFilter {
    #[default]
    All,
    Yes,
    No,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttendanceFilter {
    /// `YYYY-MM-DD`, matched against the local sign-in date.
    pub date: Option<String>,
    pub engineer_id: Option<String>,
    #[serde(default)]
    pub overtime: OvertimeFilter,
}

impl AttendanceFilter {
    fn matches(&self, record: &AttendanceRecord) -> bool {
        self.date.as_deref().is_none_or(|date| record.date == date)
            && self
                .engineer_id
                .as_deref()
                .is_none_or(|id| record.engineer_id == id)
            && match self.overtime {
                OvertimeFilter::All => true,
                OvertimeFilter::Yes => record.has_overtime(),
                OvertimeFilter::No => !record.has_overtime(),
            }
    }
}

/// Matching sessions, most recent sign-in first.
pub fn list_attendance(state: &Collections, filter: &AttendanceFilter) -> Vec<AttendanceRecord> {
    let mut records: Vec<AttendanceRecord> = state
        .attendance
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    records.sort_by(|a, b| b.login_time.cmp(&a.login_time));
    records
}

pub fn attendance_csv(
    records: &[AttendanceRecord],
    generated_at: EpochMillis,
    offset: FixedOffset,
) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.engineer_name.clone(),
                record.date.clone(),
                format_local(record.login_time, offset),
                record
                    .logout_time
                    .map(|at| format_local(at, offset))
                    .unwrap_or_else(|| "Active".to_string()),
                record
                    .total_minutes
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                record.overtime_minutes.unwrap_or(0).to_string(),
                if record.is_open() {
                    "Currently On-Duty"
                } else {
                    "Shift Ended"
                }
                .to_string(),
            ]
        })
        .collect();
    render_report(
        ATTENDANCE_REPORT_TITLE,
        &format_local(generated_at, offset),
        &HEADERS,
        &rows,
    )
}
