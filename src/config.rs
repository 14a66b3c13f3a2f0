//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER: &str = "operator";
pub const DEFAULT_HOST: &str = "owenofarrell";
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://owenofarrell.dev/api/contact";
pub const DEFAULT_CONTACT_TIMEOUT_SEC: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub user: String,
    pub host: String,
    pub contact_endpoint: String,
    pub contact_timeout: Duration,
    pub sound: bool,
    pub skip_boot: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            host: DEFAULT_HOST.to_string(),
            contact_endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            contact_timeout: Duration::from_secs(DEFAULT_CONTACT_TIMEOUT_SEC),
            sound: false,
            skip_boot: false,
            log_file: None,
        }
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            user: env_string_opt("OFO_USER").unwrap_or(defaults.user),
            host: env_string_opt("OFO_HOST").unwrap_or(defaults.host),
            contact_endpoint: env_string_opt("OFO_CONTACT_ENDPOINT")
                .unwrap_or(defaults.contact_endpoint),
            contact_timeout: env_string_opt("OFO_CONTACT_TIMEOUT_SEC")
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.contact_timeout),
            sound: env_flag("OFO_SOUND"),
            skip_boot: env_flag("OFO_SKIP_BOOT"),
            log_file: env_string_opt("OFO_LOG").map(PathBuf::from),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
