use crate::modules::crm::core::decision::{DecideError, Decision};
use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::core::state::{AccountStatus, Subscriber};
use crate::shared::core::actor::Actor;
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

/// Editable part of a subscriber record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub building_name: String,
    pub unit_number: String,
    pub router_serial: String,
    pub plan: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSubscriber {
    pub actor_id: String,
    pub details: SubscriberDetails,
}

/// Whole-record replace. A missing status keeps the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSubscriber {
    pub actor_id: String,
    pub subscriber_id: String,
    pub details: SubscriberDetails,
    pub status: Option<AccountStatus>,
}

pub fn decide_register_subscriber(
    state: &Collections,
    command: RegisterSubscriber,
    stamp: &Stamp<'_>,
) -> Decision {
    try_register(state, command, stamp).into()
}

fn try_register(
    state: &Collections,
    command: RegisterSubscriber,
    stamp: &Stamp<'_>,
) -> Result<Vec<CrmEvent>, DecideError> {
    acting(state, &command.actor_id)?;
    let details = validated(command.details)?;
    if state.subscriber_by_phone(&details.phone).is_some() {
        return Err(DecideError::DuplicatePhone(details.phone));
    }
    Ok(vec![CrmEvent::SubscriberRegistered {
        subscriber: build(stamp.id("sub"), details, AccountStatus::Active),
    }])
}

pub fn decide_update_subscriber(state: &Collections, command: UpdateSubscriber) -> Decision {
    try_update(state, command).into()
}

fn try_update(state: &Collections, command: UpdateSubscriber) -> Result<Vec<CrmEvent>, DecideError> {
    let actor = acting(state, &command.actor_id)?;
    let current = state
        .subscriber(&command.subscriber_id)
        .ok_or_else(|| DecideError::SubscriberNotFound(command.subscriber_id.clone()))?;
    let details = validated(command.details)?;
    if state
        .subscriber_by_phone(&details.phone)
        .is_some_and(|other| other.id != current.id)
    {
        return Err(DecideError::DuplicatePhone(details.phone));
    }
    let status = command.status.unwrap_or(current.status);
    if status != current.status {
        may_set_status(&actor, status)?;
    }
    Ok(vec![CrmEvent::SubscriberUpdated {
        subscriber: build(current.id.clone(), details, status),
    }])
}

pub(crate) fn acting(state: &Collections, actor_id: &str) -> Result<Actor, DecideError> {
    state
        .actor(actor_id)
        .ok_or_else(|| DecideError::UnknownActor(actor_id.to_string()))
}

pub(crate) fn may_set_status(actor: &Actor, status: AccountStatus) -> Result<(), DecideError> {
    if status == AccountStatus::Unsubscribed && !actor.is_manager() {
        return Err(DecideError::ManagerOnly("unsubscribe members"));
    }
    Ok(())
}

/// Phone numbers are stored trimmed and must carry a leading '+'.
pub(crate) fn valid_phone(phone: &str) -> Result<String, DecideError> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Err(DecideError::MissingField("phone"));
    }
    if !phone.starts_with('+') {
        return Err(DecideError::InvalidPhone(phone.to_string()));
    }
    Ok(phone.to_string())
}

fn validated(details: SubscriberDetails) -> Result<SubscriberDetails, DecideError> {
    let name = details.name.trim().to_string();
    if name.is_empty() {
        return Err(DecideError::MissingField("name"));
    }
    Ok(SubscriberDetails {
        name,
        phone: valid_phone(&details.phone)?,
        email: details.email.trim().to_string(),
        building_name: details.building_name.trim().to_string(),
        unit_number: details.unit_number.trim().to_string(),
        router_serial: details.router_serial.trim().to_string(),
        plan: details.plan.trim().to_string(),
    })
}

pub(crate) fn build(id: String, details: SubscriberDetails, status: AccountStatus) -> Subscriber {
    Subscriber {
        id,
        name: details.name,
        phone: details.phone,
        email: details.email,
        building_name: details.building_name,
        unit_number: details.unit_number,
        router_serial: details.router_serial,
        plan: details.plan,
        status,
    }
}
