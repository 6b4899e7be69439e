// Derived views over the current collections. Nothing here is stored; every
// figure is recomputed from a snapshot on request.

use chrono::{Days, FixedOffset};
use serde::Serialize;
use std::collections::HashMap;

use crate::modules::tickets::core::state::{Ticket, TicketPriority, TicketStatus};
use crate::modules::tickets::use_cases::ticket_queries::{TicketRow, engineer_name, subscriber_name};
use crate::shared::core::primitives::{EpochMillis, MILLIS_PER_MINUTE, local_date};
use crate::shared::infrastructure::state_store::Collections;

pub const TREND_DAYS: u64 = 7;
pub const DASHBOARD_TOP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub on_site: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineerLoad {
    pub engineer_id: String,
    pub name: String,
    pub active: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub mttr_minutes: i64,
    pub on_site_rate_percent: u32,
    pub active_load: usize,
    pub emergency: usize,
    pub status_breakdown: StatusBreakdown,
    pub engineer_load: Vec<EngineerLoad>,
    pub trend: Vec<DayCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub open: usize,
    pub emergency_alerts: usize,
    pub pending_site_visits: usize,
    pub subscribers: usize,
    pub urgent: Vec<TicketRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecurringIssue {
    pub building_name: String,
    pub unit_number: String,
    pub count: usize,
}

/// Mean of `resolved_at - created_at` over Resolved tickets, rounded to whole
/// minutes. Zero when nothing is resolved.
pub fn mean_time_to_resolve(tickets: &[Ticket]) -> i64 {
    let durations: Vec<EpochMillis> = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Resolved)
        .filter_map(|t| t.resolved_at.map(|at| at - t.created_at))
        .collect();
    if durations.is_empty() {
        return 0;
    }
    let mean = durations.iter().sum::<i64>() as f64 / durations.len() as f64;
    (mean / MILLIS_PER_MINUTE as f64).round() as i64
}

/// Share of tickets that need or needed a site visit, as a rounded percentage.
pub fn on_site_rate(tickets: &[Ticket]) -> u32 {
    if tickets.is_empty() {
        return 0;
    }
    let visits = tickets.iter().filter(|t| t.is_site_visit()).count();
    ((visits as f64 / tickets.len() as f64) * 100.0).round() as u32
}

pub fn status_breakdown(tickets: &[Ticket]) -> StatusBreakdown {
    let count = |status: TicketStatus| tickets.iter().filter(|t| t.status == status).count();
    StatusBreakdown {
        open: count(TicketStatus::Open),
        in_progress: count(TicketStatus::InProgress),
        resolved: count(TicketStatus::Resolved),
        on_site: tickets.iter().filter(|t| t.is_site_visit()).count(),
    }
}

/// Non-Closed tickets per rostered engineer, in roster order. Unassigned
/// tickets count towards nobody.
pub fn engineer_load(state: &Collections) -> Vec<EngineerLoad> {
    let mut active: HashMap<&str, usize> = HashMap::new();
    for ticket in state.tickets.iter().filter(|t| t.status != TicketStatus::Closed) {
        if let Some(id) = ticket.assigned_engineer_id.as_deref() {
            *active.entry(id).or_default() += 1;
        }
    }
    state
        .engineers
        .iter()
        .map(|engineer| EngineerLoad {
            engineer_id: engineer.id.clone(),
            name: engineer.name.clone(),
            active: active.get(engineer.id.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Tickets created on each of the last seven local calendar days, oldest first,
/// today last.
pub fn weekly_trend(tickets: &[Ticket], now: EpochMillis, offset: FixedOffset) -> Vec<DayCount> {
    let Some(today) = local_date(now, offset) else {
        return Vec::new();
    };
    (0..TREND_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|day| DayCount {
            date: day.to_string(),
            count: tickets
                .iter()
                .filter(|t| local_date(t.created_at, offset) == Some(day))
                .count(),
        })
        .collect()
}

pub fn kpis(state: &Collections, now: EpochMillis, offset: FixedOffset) -> Kpis {
    let tickets = &state.tickets;
    Kpis {
        mttr_minutes: mean_time_to_resolve(tickets),
        on_site_rate_percent: on_site_rate(tickets),
        active_load: tickets
            .iter()
            .filter(|t| t.status != TicketStatus::Closed)
            .count(),
        emergency: tickets
            .iter()
            .filter(|t| t.priority == TicketPriority::Emergency)
            .count(),
        status_breakdown: status_breakdown(tickets),
        engineer_load: engineer_load(state),
        trend: weekly_trend(tickets, now, offset),
    }
}

pub fn dashboard(state: &Collections) -> Dashboard {
    let tickets = &state.tickets;
    let mut urgent: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| matches!(t.priority, TicketPriority::High | TicketPriority::Emergency))
        .collect();
    urgent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Dashboard {
        open: tickets.iter().filter(|t| t.status == TicketStatus::Open).count(),
        emergency_alerts: tickets
            .iter()
            .filter(|t| t.priority == TicketPriority::Emergency && t.status != TicketStatus::Closed)
            .count(),
        pending_site_visits: tickets
            .iter()
            .filter(|t| t.status == TicketStatus::PendingSiteVisit)
            .count(),
        subscribers: state.subscribers.len(),
        urgent: urgent
            .into_iter()
            .take(DASHBOARD_TOP)
            .map(|ticket| TicketRow {
                subscriber_name: subscriber_name(state, ticket),
                engineer_name: engineer_name(state, ticket),
                ticket: ticket.clone(),
            })
            .collect(),
    }
}

/// Units with two or more tickets, most frequent first. Guest tickets have no
/// unit and are left out.
pub fn recurring_issues(state: &Collections) -> Vec<RecurringIssue> {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
    for ticket in &state.tickets {
        if let Some(subscriber) = ticket
            .subscriber_id
            .as_deref()
            .and_then(|id| state.subscriber(id))
        {
            *counts
                .entry((subscriber.building_name.as_str(), subscriber.unit_number.as_str()))
                .or_default() += 1;
        }
    }
    let mut issues: Vec<RecurringIssue> = counts
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|((building, unit), count)| RecurringIssue {
            building_name: building.to_string(),
            unit_number: unit.to_string(),
            count,
        })
        .collect();
    issues.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.building_name.cmp(&b.building_name))
            .then_with(|| a.unit_number.cmp(&b.unit_number))
    });
    issues
}
