use std::time::Duration;

use crate::endpoint::DEFAULT_CONTACT_ENDPOINT;

/// Transport configuration for contact submissions.
#[derive(Debug, Clone)]
pub struct ContactApiConfig {
    /// Absolute `http`/`https` URL of the relay.
    pub endpoint: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
}

impl Default for ContactApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CONTACT_ENDPOINT.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl ContactApiConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
