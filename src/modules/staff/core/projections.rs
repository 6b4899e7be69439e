use crate::modules::staff::core::events::StaffEvent;
use crate::shared::infrastructure::state_store::Mutation;

pub fn apply(event: &StaffEvent) -> Vec<Mutation> {
    let mut mutations = vec![Mutation::UpsertEngineer(event.engineer().clone())];
    if let Some(record) = event.attendance() {
        mutations.push(Mutation::UpsertAttendance(record.clone()));
    }
    mutations
}
