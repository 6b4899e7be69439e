use crate::modules::crm::core::decision::{DecideError, Decision};
use crate::modules::crm::core::events::CrmEvent;
use crate::modules::crm::core::state::{Building, InternetPackage};
use crate::modules::crm::use_cases::maintain_subscriber::acting;
use crate::shared::core::primitives::Stamp;
use crate::shared::infrastructure::state_store::Collections;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBuilding {
    pub actor_id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPackage {
    pub actor_id: String,
    pub name: String,
    pub speed: String,
}

pub fn decide_add_building(state: &Collections, command: AddBuilding, stamp: &Stamp<'_>) -> Decision {
    try_add_building(state, command, stamp).into()
}

fn try_add_building(
    state: &Collections,
    command: AddBuilding,
    stamp: &Stamp<'_>,
) -> Result<Vec<CrmEvent>, DecideError> {
    manager(state, &command.actor_id)?;
    let name = command.name.trim();
    if name.is_empty() {
        return Err(DecideError::MissingField("name"));
    }
    Ok(vec![CrmEvent::BuildingAdded {
        building: Building {
            id: stamp.id("bld"),
            name: name.to_string(),
            address: command.address.trim().to_string(),
        },
    }])
}

pub fn decide_add_package(state: &Collections, command: AddPackage, stamp: &Stamp<'_>) -> Decision {
    try_add_package(state, command, stamp).into()
}

fn try_add_package(
    state: &Collections,
    command: AddPackage,
    stamp: &Stamp<'_>,
) -> Result<Vec<CrmEvent>, DecideError> {
    manager(state, &command.actor_id)?;
    let name = command.name.trim();
    if name.is_empty() {
        return Err(DecideError::MissingField("name"));
    }
    Ok(vec![CrmEvent::PackageAdded {
        package: InternetPackage {
            id: stamp.id("pkg"),
            name: name.to_string(),
            speed: command.speed.trim().to_string(),
        },
    }])
}

fn manager(state: &Collections, actor_id: &str) -> Result<(), DecideError> {
    if acting(state, actor_id)?.is_manager() {
        Ok(())
    } else {
        Err(DecideError::ManagerOnly("manage reference data"))
    }
}
