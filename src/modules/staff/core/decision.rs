use crate::modules::staff::core::events::StaffEvent;
use crate::shared::application::errors::ApplicationError;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("unknown engineer '{0}'")]
    UnknownEngineer(String),

    #[error("invalid credentials")]
    InvalidCredentials,
}

pub type Decision = crate::shared::core::decision::Decision<StaffEvent, DecideError>;

impl From<DecideError> for ApplicationError {
    fn from(reason: DecideError) -> Self {
        ApplicationError::Unauthenticated(reason.to_string())
    }
}
