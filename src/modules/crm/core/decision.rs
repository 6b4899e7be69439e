use crate::modules::crm::core::events::CrmEvent;
use crate::shared::application::errors::ApplicationError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("unknown engineer '{0}'")]
    UnknownActor(String),

    #[error("subscriber '{0}' not found")]
    SubscriberNotFound(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("phone number '{0}' must be in international format (e.g. +60...)")]
    InvalidPhone(String),

    #[error("phone number '{0}' already belongs to another subscriber")]
    DuplicatePhone(String),

    #[error("only managers may {0}")]
    ManagerOnly(&'static str),
}

pub type Decision = crate::shared::core::decision::Decision<CrmEvent, DecideError>;

impl From<DecideError> for ApplicationError {
    fn from(reason: DecideError) -> Self {
        let message = reason.to_string();
        match reason {
            DecideError::UnknownActor(_) => ApplicationError::Unauthenticated(message),
            DecideError::SubscriberNotFound(_) => ApplicationError::NotFound(message),
            DecideError::MissingField(_) | DecideError::InvalidPhone(_) => {
                ApplicationError::Validation(message)
            }
            DecideError::DuplicatePhone(_) => ApplicationError::Domain(message),
            DecideError::ManagerOnly(_) => ApplicationError::Forbidden(message),
        }
    }
}
