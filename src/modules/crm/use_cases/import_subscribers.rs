// Bulk subscriber upsert from spreadsheet text.
//
// Layout
// - First line is a header and is ignored.
// - Columns are positional: Name, Phone, Email, Condo, Unit, SN, and an optional Plan.
// - Rows with fewer than six cells, no phone, or a phone without a leading '+'
//   are skipped. Blank lines are ignored outright.
// - A phone already on file updates that subscriber in place (same id, same
//   status). Repeated phones within one file update the row created earlier.

use crate::modules::crm::core::decision::{DecideError, Decision};
use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::core::state::{AccountStatus, Subscriber};
use crate::modules::crm::use_cases::maintain_subscriber::acting;
use crate::shared::core::csv::split_line;
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;
use serde::Serialize;

const MIN_COLUMNS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSubscribers {
    pub actor_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub log: Vec<String>,
}

impl ImportReport {
    pub fn from_event(event: &CrmEvent) -> Option<Self> {
        match event {
            CrmEvent::SubscribersImported {
                created,
                updated,
                skipped,
                log,
            } => Some(Self {
                created: created.len(),
                updated: updated.len(),
                skipped: *skipped,
                log: log.clone(),
            }),
            _ => None,
        }
    }
}

struct ImportRow {
    name: String,
    phone: String,
    email: String,
    building_name: String,
    unit_number: String,
    router_serial: String,
    plan: Option<String>,
}

fn parse_row(line: &str) -> Option<ImportRow> {
    let cells = split_line(line);
    if cells.len() < MIN_COLUMNS {
        return None;
    }
    let phone = cells[1].clone();
    if !phone.starts_with('+') {
        return None;
    }
    Some(ImportRow {
        name: cells[0].clone(),
        phone,
        email: cells[2].clone(),
        building_name: cells[3].clone(),
        unit_number: cells[4].clone(),
        router_serial: cells[5].clone(),
        plan: cells.get(6).filter(|plan| !plan.is_empty()).cloned(),
    })
}

impl ImportRow {
    fn overwrite(self, subscriber: &mut Subscriber) {
        subscriber.name = self.name;
        subscriber.email = self.email;
        subscriber.building_name = self.building_name;
        subscriber.unit_number = self.unit_number;
        subscriber.router_serial = self.router_serial;
        if let Some(plan) = self.plan {
            subscriber.plan = plan;
        }
    }
}

pub fn decide_import(state: &Collections, command: ImportSubscribers, stamp: &Stamp<'_>) -> Decision {
    try_import(state, command, stamp).into()
}

fn try_import(
    state: &Collections,
    command: ImportSubscribers,
    stamp: &Stamp<'_>,
) -> Result<Vec<CrmEvent>, DecideError> {
    acting(state, &command.actor_id)?;

    let mut created: Vec<Subscriber> = Vec::new();
    let mut updated: Vec<Subscriber> = Vec::new();
    let mut skipped = 0;
    let mut log = Vec::new();

    for line in command.text.lines().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let Some(row) = parse_row(line) else {
            skipped += 1;
            continue;
        };
        let entry = format!("{} ({})", row.name, row.phone);

        if let Some(pending) = created
            .iter_mut()
            .chain(updated.iter_mut())
            .find(|s| s.phone == row.phone)
        {
            row.overwrite(pending);
            log.push(format!("Updated: {entry}"));
        } else if let Some(existing) = state.subscriber_by_phone(&row.phone) {
            let mut subscriber = existing.clone();
            row.overwrite(&mut subscriber);
            updated.push(subscriber);
            log.push(format!("Updated: {entry}"));
        } else {
            let mut subscriber = Subscriber {
                id: stamp.id("sub"),
                name: String::new(),
                phone: row.phone.clone(),
                email: String::new(),
                building_name: String::new(),
                unit_number: String::new(),
                router_serial: String::new(),
                plan: String::new(),
                status: AccountStatus::Active,
            };
            row.overwrite(&mut subscriber);
            created.push(subscriber);
            log.push(format!("Created: {entry}"));
        }
    }

    Ok(vec![CrmEvent::SubscribersImported {
        created,
        updated,
        skipped,
        log,
    }])
}
