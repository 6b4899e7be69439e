use std::net::SocketAddr;
use std::path::PathBuf;

use crate::modules::staff::core::shift_policy::BusinessHours;
use crate::shared::core::primitives::utc_offset;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_SHARED_SECRET: &str = "password123";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("HELPDESK_ADDR '{0}' is not a socket address")]
    InvalidAddr(String),

    #[error("HELPDESK_BUSINESS_HOURS '{0}' must look like 9-20 with start < end <= 24")]
    InvalidBusinessHours(String),

    #[error("HELPDESK_UTC_OFFSET_MINUTES '{0}' must be whole minutes within +/-1439")]
    InvalidOffset(String),

    #[error("{name} '{value}' is not a boolean")]
    InvalidBool { name: &'static str, value: String },

    #[error("HELPDESK_SHARED_SECRET must not be empty")]
    EmptySecret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
    /// None keeps everything in memory.
    pub data_path: Option<PathBuf>,
    pub shared_secret: String,
    pub business_hours: BusinessHours,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let addr_raw = var("HELPDESK_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(addr_raw.clone()))?;

        let shared_secret = match lookup("HELPDESK_SHARED_SECRET") {
            None => DEFAULT_SHARED_SECRET.to_string(),
            Some(secret) if secret.is_empty() => return Err(ConfigError::EmptySecret),
            Some(secret) => secret,
        };

        let offset_minutes = match var("HELPDESK_UTC_OFFSET_MINUTES") {
            None => 0,
            Some(raw) => raw
                .parse::<i32>()
                .ok()
                .filter(|m| m.abs() < 24 * 60)
                .ok_or(ConfigError::InvalidOffset(raw))?,
        };

        let (start_hour, end_hour) = match var("HELPDESK_BUSINESS_HOURS") {
            None => (9, 20),
            Some(raw) => parse_hours(&raw).ok_or(ConfigError::InvalidBusinessHours(raw))?,
        };

        let seed_demo = match var("HELPDESK_SEED_DEMO") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                name: "HELPDESK_SEED_DEMO",
                value: raw,
            })?,
        };

        Ok(Self {
            addr,
            data_path: var("HELPDESK_DATA_PATH").map(PathBuf::from),
            shared_secret,
            business_hours: BusinessHours::new(start_hour, end_hour, utc_offset(offset_minutes)),
            seed_demo,
        })
    }
}

fn parse_hours(raw: &str) -> Option<(u32, u32)> {
    let (start, end) = raw.split_once('-')?;
    let start: u32 = start.trim().parse().ok()?;
    let end: u32 = end.trim().parse().ok()?;
    (start < end && end <= 24).then_some((start, end))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[rstest]
    fn it_should_fall_back_to_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.data_path, None);
        assert_eq!(config.shared_secret, DEFAULT_SHARED_SECRET);
        assert_eq!(config.business_hours, BusinessHours::default());
        assert!(config.seed_demo);
    }

    #[rstest]
    fn it_should_read_every_variable() {
        let config = config(&[
            ("HELPDESK_ADDR", "127.0.0.1:9000"),
            ("HELPDESK_DATA_PATH", "/var/lib/helpdesk/state.json"),
            ("HELPDESK_SHARED_SECRET", "s3cret"),
            ("HELPDESK_BUSINESS_HOURS", "8-18"),
            ("HELPDESK_UTC_OFFSET_MINUTES", "480"),
            ("HELPDESK_SEED_DEMO", "no"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(
            config.data_path,
            Some(PathBuf::from("/var/lib/helpdesk/state.json"))
        );
        assert_eq!(config.shared_secret, "s3cret");
        assert_eq!(
            config.business_hours,
            BusinessHours::new(8, 18, utc_offset(480))
        );
        assert!(!config.seed_demo);
    }

    #[rstest]
    #[case("HELPDESK_ADDR", "localhost")]
    #[case("HELPDESK_BUSINESS_HOURS", "20-9")]
    #[case("HELPDESK_BUSINESS_HOURS", "nine-five")]
    #[case("HELPDESK_UTC_OFFSET_MINUTES", "1440")]
    #[case("HELPDESK_SEED_DEMO", "maybe")]
    #[case("HELPDESK_SHARED_SECRET", "")]
    fn it_should_reject_invalid_values(#[case] name: &str, #[case] value: &str) {
        assert!(config(&[(name, value)]).is_err());
    }
}
