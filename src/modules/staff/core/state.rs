use crate::shared::core::actor::{Actor, Role};
use crate::shared::core::primitives::EpochMillis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engineer {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub is_on_shift: bool,
    pub last_login: Option<EpochMillis>,
    pub last_logout: Option<EpochMillis>,
}

impl Engineer {
    pub fn as_actor(&self) -> Actor {
        Actor {
            engineer_id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// One signed-in session. Open while `logout_time` is None.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub engineer_id: String,
    pub engineer_name: String,
    /// Local calendar date of the sign-in, `YYYY-MM-DD`.
    pub date: String,
    pub login_time: EpochMillis,
    pub logout_time: Option<EpochMillis>,
    pub total_minutes: Option<i64>,
    pub overtime_minutes: Option<i64>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.logout_time.is_none()
    }

    pub fn has_overtime(&self) -> bool {
        self.overtime_minutes.is_some_and(|minutes| minutes > 0)
    }
}
