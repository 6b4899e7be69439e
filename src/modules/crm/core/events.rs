use crate::modules::crm::core::state::{AccountStatus, Building, InternetPackage, Subscriber};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrmEvent {
    SubscriberRegistered {
        subscriber: Subscriber,
    },
    SubscriberUpdated {
        subscriber: Subscriber,
    },
    SubscriberStatusChanged {
        subscriber: Subscriber,
        from: AccountStatus,
    },
    /// The subscriber and every ticket that referenced it.
    SubscriberDeleted {
        subscriber_id: String,
        ticket_ids: Vec<String>,
    },
    SubscribersImported {
        created: Vec<Subscriber>,
        updated: Vec<Subscriber>,
        skipped: usize,
        log: Vec<String>,
    },
    BuildingAdded {
        building: Building,
    },
    PackageAdded {
        package: InternetPackage,
    },
}

impl CrmEvent {
    pub fn subscriber(&self) -> Option<&Subscriber> {
        match self {
            CrmEvent::SubscriberRegistered { subscriber }
            | CrmEvent::SubscriberUpdated { subscriber }
            | CrmEvent::SubscriberStatusChanged { subscriber, .. } => Some(subscriber),
            _ => None,
        }
    }
}
