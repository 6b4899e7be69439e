// Demo roster, subscribers and tickets for a fresh store.

use crate::modules::crm::core::state::{AccountStatus, Building, InternetPackage, Subscriber};
use crate::modules::staff::core::state::Engineer;
use crate::modules::tickets::core::state::{Channel, Ticket, TicketPriority, TicketStatus};
use crate::shared::core::actor::Role;
use crate::shared::core::primitives::{EpochMillis, MILLIS_PER_MINUTE};
use crate::shared::infrastructure::state_store::{Mutation, StateStore, StoreError};

fn engineer(id: &str, name: &str, role: Role) -> Engineer {
    Engineer {
        id: id.to_string(),
        name: name.to_string(),
        role,
        is_on_shift: false,
        last_login: None,
        last_logout: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn subscriber(
    id: &str,
    name: &str,
    phone: &str,
    email: &str,
    building: &str,
    unit: &str,
    serial: &str,
    plan: &str,
    status: AccountStatus,
) -> Subscriber {
    Subscriber {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        email: email.to_string(),
        building_name: building.to_string(),
        unit_number: unit.to_string(),
        router_serial: serial.to_string(),
        plan: plan.to_string(),
        status,
    }
}

pub fn demo_mutations(now: EpochMillis) -> Vec<Mutation> {
    let engineers = [
        engineer("eng-1", "Zack Wilson", Role::Engineer),
        engineer("eng-2", "Sarah Chen", Role::Engineer),
        engineer("mgr-1", "Admin Manager", Role::Manager),
    ];
    let subscribers = [
        subscriber(
            "sub-1",
            "Alice Johnson",
            "+60123456789",
            "alice@example.com",
            "Horizon Residences",
            "A-12-05",
            "SN-HOR-001293",
            "500Mbps Fiber",
            AccountStatus::Active,
        ),
        subscriber(
            "sub-2",
            "Bob Smith",
            "+60119876543",
            "bob@smith.me",
            "Skyline Towers",
            "B-05-11",
            "SN-SKY-992211",
            "100Mbps Basic",
            AccountStatus::Suspended,
        ),
        subscriber(
            "sub-3",
            "Charlie Davis",
            "+60172233445",
            "charlie.d@gmail.com",
            "Horizon Residences",
            "C-22-01",
            "SN-HOR-887766",
            "1Gbps Ultra",
            AccountStatus::Active,
        ),
    ];
    let tickets = [
        Ticket {
            id: "TKT-1001".into(),
            subscriber_id: Some("sub-1".into()),
            subject: "Slow internet connection".into(),
            description: "Speeds dropped from 500Mbps to 10Mbps today.".into(),
            priority: TicketPriority::High,
            status: TicketStatus::InProgress,
            assigned_engineer_id: Some("eng-1".into()),
            channel: Channel::WhatsApp,
            created_at: now - 60 * MILLIS_PER_MINUTE,
            resolved_at: None,
            hardware_replacement: None,
            follow_up_note: None,
        },
        Ticket {
            id: "TKT-1002".into(),
            subscriber_id: Some("sub-2".into()),
            subject: "Complete loss of service".into(),
            description: "Red light flashing on router since morning.".into(),
            priority: TicketPriority::Emergency,
            status: TicketStatus::Open,
            assigned_engineer_id: None,
            channel: Channel::Manual,
            created_at: now - 120 * MILLIS_PER_MINUTE,
            resolved_at: None,
            hardware_replacement: None,
            follow_up_note: None,
        },
    ];
    let buildings = [
        ("bld-1", "Horizon Residences", "Jalan Ampang, Kuala Lumpur"),
        ("bld-2", "Skyline Towers", "Jalan Tun Razak, Kuala Lumpur"),
    ];
    let packages = [
        ("pkg-1", "100Mbps Basic", "100Mbps"),
        ("pkg-2", "500Mbps Fiber", "500Mbps"),
        ("pkg-3", "1Gbps Ultra", "1Gbps"),
    ];

    engineers
        .into_iter()
        .map(Mutation::UpsertEngineer)
        .chain(subscribers.into_iter().map(Mutation::UpsertSubscriber))
        .chain(tickets.into_iter().map(Mutation::UpsertTicket))
        .chain(buildings.into_iter().map(|(id, name, address)| {
            Mutation::UpsertBuilding(Building {
                id: id.into(),
                name: name.into(),
                address: address.into(),
            })
        }))
        .chain(packages.into_iter().map(|(id, name, speed)| {
            Mutation::UpsertPackage(InternetPackage {
                id: id.into(),
                name: name.into(),
                speed: speed.into(),
            })
        }))
        .collect()
}

/// Seeds the demo data into an empty store. Returns whether anything was written.
pub async fn seed_if_empty(store: &dyn StateStore, now: EpochMillis) -> Result<bool, StoreError> {
    let snapshot = store.load().await?;
    if !snapshot.collections.is_empty() {
        tracing::debug!(version = snapshot.version, "store already populated, skipping seed");
        return Ok(false);
    }
    let version = store.commit(snapshot.version, demo_mutations(now)).await?;
    tracing::info!(version, "demo data seeded");
    Ok(true)
}

#[cfg(test)]
mod seed_tests {
    use super::*;
    use crate::shared::infrastructure::state_store::in_memory::InMemoryStateStore;
    use crate::shared::infrastructure::state_store::{Collections, apply_mutations};
    use crate::tests::fixtures::NOW;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_seed_only_once() {
        let store = InMemoryStateStore::new();
        assert!(seed_if_empty(&store, NOW).await.unwrap());
        assert!(!seed_if_empty(&store, NOW).await.unwrap());

        let snapshot = store.load().await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.collections.engineers.len(), 3);
        assert_eq!(snapshot.collections.subscribers.len(), 3);
        assert_eq!(snapshot.collections.tickets.len(), 2);
    }

    #[rstest]
    fn it_should_only_reference_seeded_records() {
        let mut collections = Collections::default();
        apply_mutations(&mut collections, demo_mutations(NOW));
        for ticket in &collections.tickets {
            if let Some(id) = ticket.subscriber_id.as_deref() {
                assert!(collections.subscriber(id).is_some());
            }
            if let Some(id) = ticket.assigned_engineer_id.as_deref() {
                assert!(collections.engineer(id).is_some());
            }
        }
    }
}
