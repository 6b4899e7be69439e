use std::sync::Arc;

use crate::modules::crm::handler::CrmHandler;
use crate::modules::reporting::handler::ReportsHandler;
use crate::modules::staff::handler::StaffHandler;
use crate::modules::tickets::core::presence::PresenceBoard;
use crate::modules::tickets::handler::TicketsHandler;
use crate::shared::application::command_runner::CommandRunner;
use crate::shared::core::primitives::{Clock, IdGenerator};
use crate::shared::infrastructure::state_store::StateStore;
use crate::shell::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub crm: Arc<CrmHandler>,
    pub tickets: Arc<TicketsHandler>,
    pub staff: Arc<StaffHandler>,
    pub reports: Arc<ReportsHandler>,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let runner = CommandRunner::new(store.clone(), clock, ids);
        let hours = config.business_hours;
        Self {
            store,
            crm: Arc::new(CrmHandler::new(runner.clone())),
            tickets: Arc::new(TicketsHandler::new(
                runner.clone(),
                Arc::new(PresenceBoard::new()),
            )),
            staff: Arc::new(StaffHandler::new(
                runner.clone(),
                config.shared_secret.clone(),
                hours,
            )),
            reports: Arc::new(ReportsHandler::new(runner, hours.offset)),
        }
    }
}
