// The single state store behind every bounded context.
//
// Purpose
// - Hold every collection (subscribers, tickets, comments, engineers, attendance,
//   buildings, packages) as one versioned snapshot.
//
// Responsibilities
// - Apply a batch of mutations all-or-nothing, so cascades across collections never
//   leave them half updated.
// - Enforce optimistic concurrency by checking the expected version.

use crate::modules::crm::core::state::{Building, InternetPackage, Subscriber};
use crate::modules::staff::core::state::{AttendanceRecord, Engineer};
use crate::modules::tickets::core::state::{Comment, Ticket};
use crate::shared::core::actor::Actor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("version mismatch: expected {expected}, actual {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("backend error: {0}")]
    Backend(String),
}

/// Every collection, keyed the way it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collections {
    #[serde(rename = "isp_subscribers", default)]
    pub subscribers: Vec<Subscriber>,
    #[serde(rename = "isp_tickets", default)]
    pub tickets: Vec<Ticket>,
    #[serde(rename = "isp_comments", default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "isp_engineers", default)]
    pub engineers: Vec<Engineer>,
    #[serde(rename = "isp_attendance", default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(rename = "isp_buildings", default)]
    pub buildings: Vec<Building>,
    #[serde(rename = "isp_packages", default)]
    pub packages: Vec<InternetPackage>,
}

impl Collections {
    pub fn subscriber(&self, id: &str) -> Option<&Subscriber> {
        self.subscribers.iter().find(|s| s.id == id)
    }

    pub fn subscriber_by_phone(&self, phone: &str) -> Option<&Subscriber> {
        self.subscribers.iter().find(|s| s.phone == phone)
    }

    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    pub fn engineer(&self, id: &str) -> Option<&Engineer> {
        self.engineers.iter().find(|e| e.id == id)
    }

    /// The engineer acting under `engineer_id`, if they are on the roster.
    pub fn actor(&self, engineer_id: &str) -> Option<Actor> {
        self.engineer(engineer_id).map(Engineer::as_actor)
    }

    pub fn open_attendance_for(&self, engineer_id: &str) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .rev()
            .find(|record| record.engineer_id == engineer_id && record.is_open())
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
            && self.tickets.is_empty()
            && self.comments.is_empty()
            && self.engineers.is_empty()
            && self.attendance.is_empty()
            && self.buildings.is_empty()
            && self.packages.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: i64,
    #[serde(flatten)]
    pub collections: Collections,
}

/// Whole-record changes produced by the projections of each context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    UpsertSubscriber(Subscriber),
    RemoveSubscriber { subscriber_id: String },
    UpsertTicket(Ticket),
    RemoveTicket { ticket_id: String },
    AppendComment(Comment),
    RemoveCommentsForTicket { ticket_id: String },
    UpsertEngineer(Engineer),
    UpsertAttendance(AttendanceRecord),
    UpsertBuilding(Building),
    UpsertPackage(InternetPackage),
}

fn upsert<T>(items: &mut Vec<T>, item: T, id_of: impl Fn(&T) -> &str) {
    let position = items
        .iter()
        .position(|existing| id_of(existing) == id_of(&item));
    match position {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

pub fn apply_mutations(collections: &mut Collections, mutations: Vec<Mutation>) {
    for mutation in mutations {
        match mutation {
            Mutation::UpsertSubscriber(subscriber) => {
                upsert(&mut collections.subscribers, subscriber, |s| s.id.as_str())
            }
            Mutation::RemoveSubscriber { subscriber_id } => {
                collections.subscribers.retain(|s| s.id != subscriber_id)
            }
            Mutation::UpsertTicket(ticket) => {
                upsert(&mut collections.tickets, ticket, |t| t.id.as_str())
            }
            Mutation::RemoveTicket { ticket_id } => {
                collections.tickets.retain(|t| t.id != ticket_id)
            }
            Mutation::AppendComment(comment) => collections.comments.push(comment),
            Mutation::RemoveCommentsForTicket { ticket_id } => {
                collections.comments.retain(|c| c.ticket_id != ticket_id)
            }
            Mutation::UpsertEngineer(engineer) => {
                upsert(&mut collections.engineers, engineer, |e| e.id.as_str())
            }
            Mutation::UpsertAttendance(record) => {
                upsert(&mut collections.attendance, record, |r| r.id.as_str())
            }
            Mutation::UpsertBuilding(building) => {
                upsert(&mut collections.buildings, building, |b| b.id.as_str())
            }
            Mutation::UpsertPackage(package) => {
                upsert(&mut collections.packages, package, |p| p.id.as_str())
            }
        }
    }
}

/// Next snapshot after a commit, or the version conflict that prevents it.
pub fn next_snapshot(
    current: &Snapshot,
    expected_version: i64,
    mutations: Vec<Mutation>,
) -> Result<Snapshot, StoreError> {
    if current.version != expected_version {
        return Err(StoreError::VersionMismatch {
            expected: expected_version,
            actual: current.version,
        });
    }
    let mut collections = current.collections.clone();
    apply_mutations(&mut collections, mutations);
    Ok(Snapshot {
        version: current.version + 1,
        collections,
    })
}

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self) -> Result<Snapshot, StoreError>;

    /// Apply every mutation or none of them. Returns the new version.
    async fn commit(&self, expected_version: i64, mutations: Vec<Mutation>)
    -> Result<i64, StoreError>;
}

pub mod in_memory;
pub mod json_file;

#[cfg(test)]
mod state_store_tests {
    use super::*;
    use crate::tests::fixtures::{comment, subscriber, ticket};
    use rstest::rstest;

    #[rstest]
    fn it_should_replace_records_with_the_same_id() {
        let mut collections = Collections::default();
        let mut first = subscriber("sub-1", "+60100000001");
        apply_mutations(&mut collections, vec![Mutation::UpsertSubscriber(first.clone())]);
        first.name = "Renamed".to_string();
        apply_mutations(&mut collections, vec![Mutation::UpsertSubscriber(first)]);
        assert_eq!(collections.subscribers.len(), 1);
        assert_eq!(collections.subscribers[0].name, "Renamed");
    }

    #[rstest]
    fn it_should_remove_comments_only_for_the_given_ticket() {
        let mut collections = Collections::default();
        apply_mutations(
            &mut collections,
            vec![
                Mutation::UpsertTicket(ticket("TKT-1", Some("sub-1"))),
                Mutation::AppendComment(comment("c-1", "TKT-1")),
                Mutation::AppendComment(comment("c-2", "TKT-2")),
                Mutation::RemoveTicket {
                    ticket_id: "TKT-1".into(),
                },
                Mutation::RemoveCommentsForTicket {
                    ticket_id: "TKT-1".into(),
                },
            ],
        );
        assert!(collections.tickets.is_empty());
        assert_eq!(collections.comments.len(), 1);
        assert_eq!(collections.comments[0].ticket_id, "TKT-2");
    }

    #[rstest]
    fn it_should_refuse_a_stale_version() {
        let current = Snapshot {
            version: 3,
            collections: Collections::default(),
        };
        let result = next_snapshot(&current, 2, vec![]);
        assert!(matches!(
            result,
            Err(StoreError::VersionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[rstest]
    fn it_should_persist_collections_under_fixed_keys() {
        let snapshot = Snapshot::default();
        let json = serde_json::to_value(&snapshot).unwrap();
        for key in [
            "version",
            "isp_subscribers",
            "isp_tickets",
            "isp_comments",
            "isp_engineers",
            "isp_attendance",
            "isp_buildings",
            "isp_packages",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
