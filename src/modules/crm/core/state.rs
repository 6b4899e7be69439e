use crate::shared::core::actor::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Suspended,
    Unsubscribed,
}

impl AccountStatus {
    /// Next status in the Active -> Suspended -> Unsubscribed -> Active cycle.
    /// Only managers may land on Unsubscribed; everyone else skips past it.
    pub fn next_in_cycle(self, role: Role) -> AccountStatus {
        match (self, role) {
            (AccountStatus::Active, _) => AccountStatus::Suspended,
            (AccountStatus::Suspended, Role::Manager) => AccountStatus::Unsubscribed,
            (AccountStatus::Suspended, Role::Engineer) => AccountStatus::Active,
            (AccountStatus::Unsubscribed, _) => AccountStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "Active",
            AccountStatus::Suspended => "Suspended",
            AccountStatus::Unsubscribed => "Unsubscribed",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(AccountStatus::Active),
            "Suspended" => Ok(AccountStatus::Suspended),
            "Unsubscribed" => Ok(AccountStatus::Unsubscribed),
            other => Err(format!("unknown account status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub building_name: String,
    pub unit_number: String,
    pub router_serial: String,
    pub plan: String,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetPackage {
    pub id: String,
    pub name: String,
    pub speed: String,
}
