use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use url::Url;

use crate::config::ContactApiConfig;
use crate::endpoint::validate_endpoint;
use crate::error::{parse_error_message, ContactApiError};
use crate::headers::build_headers;
use crate::payload::ContactPayload;

#[derive(Debug)]
pub struct ContactApiClient {
    http: Client,
    endpoint: Url,
    config: ContactApiConfig,
}

impl ContactApiClient {
    pub fn new(config: ContactApiConfig) -> Result<Self, ContactApiError> {
        let endpoint = validate_endpoint(&config.endpoint)?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ContactApiError::from)?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn config(&self) -> &ContactApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn build_headers(&self) -> Result<HeaderMap, ContactApiError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| ContactApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(&value)
                    .map_err(|_| ContactApiError::InvalidHeader(format!("invalid value for {key}")))?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        payload: &ContactPayload,
    ) -> Result<reqwest::RequestBuilder, ContactApiError> {
        payload.validate()?;
        Ok(self
            .http
            .post(self.endpoint.clone())
            .headers(self.build_headers()?)
            .json(payload))
    }

    /// Sends the payload once. Any 2xx is success.
    pub async fn submit(&self, payload: &ContactPayload) -> Result<(), ContactApiError> {
        let response = self.build_request(payload)?.send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "contact relay accepted submission");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = parse_error_message(status, &body);
        tracing::warn!(status = status.as_u16(), %message, "contact relay rejected submission");
        Err(ContactApiError::Status(status, message))
    }
}
