use url::Url;

use crate::error::ContactApiError;

/// Default relay endpoint.
pub const DEFAULT_CONTACT_ENDPOINT: &str = "https://owenofarrell.dev/api/contact";

/// Parses `input` as an absolute `http` or `https` URL.
///
/// Blank input falls back to [`DEFAULT_CONTACT_ENDPOINT`].
pub fn validate_endpoint(input: &str) -> Result<Url, ContactApiError> {
    let raw = if input.trim().is_empty() {
        DEFAULT_CONTACT_ENDPOINT
    } else {
        input.trim()
    };

    let url = Url::parse(raw).map_err(|err| ContactApiError::InvalidEndpoint(format!("{raw}: {err}")))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        "http" | "https" => Err(ContactApiError::InvalidEndpoint(format!("{raw}: missing host"))),
        scheme => Err(ContactApiError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme '{scheme}'"
        ))),
    }
}
