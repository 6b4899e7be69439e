use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Engineer,
    Manager,
}

/// The engineer on whose behalf a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub engineer_id: String,
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}
