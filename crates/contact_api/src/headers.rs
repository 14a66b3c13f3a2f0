use std::collections::BTreeMap;

use crate::config::ContactApiConfig;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_USER_AGENT: &str = "user-agent";

const JSON: &str = "application/json";

/// Header map for a contact submission, in deterministic order.
pub fn build_headers(config: &ContactApiConfig) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert(HEADER_ACCEPT.to_owned(), JSON.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), JSON.to_owned());

    let user_agent = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), user_agent);

    headers
}

pub fn default_user_agent() -> String {
    format!(
        "ofo-shell/{} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}
