use crate::modules::tickets::core::events::TicketEvent;
use crate::shared::application::errors::ApplicationError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("unknown engineer '{0}'")]
    UnknownActor(String),

    #[error("ticket '{0}' not found")]
    TicketNotFound(String),

    #[error("subscriber '{0}' does not exist")]
    UnknownSubscriber(String),

    #[error("engineer '{0}' does not exist")]
    UnknownAssignee(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("hardware to replace is required before a site visit")]
    HardwareRequired,

    #[error("ticket '{ticket_id}' is already assigned to {engineer}")]
    AlreadyAssigned { ticket_id: String, engineer: String },

    #[error("only managers may {0}")]
    ManagerOnly(&'static str),
}

pub type Decision = crate::shared::core::decision::Decision<TicketEvent, DecideError>;

impl From<DecideError> for ApplicationError {
    fn from(reason: DecideError) -> Self {
        let message = reason.to_string();
        match reason {
            DecideError::UnknownActor(_) => ApplicationError::Unauthenticated(message),
            DecideError::TicketNotFound(_) => ApplicationError::NotFound(message),
            DecideError::UnknownSubscriber(_)
            | DecideError::UnknownAssignee(_)
            | DecideError::MissingField(_)
            | DecideError::HardwareRequired => ApplicationError::Validation(message),
            DecideError::AlreadyAssigned { .. } => ApplicationError::Domain(message),
            DecideError::ManagerOnly(_) => ApplicationError::Forbidden(message),
        }
    }
}
