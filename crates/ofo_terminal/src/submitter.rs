use contact_api::{ContactApiClient, ContactApiConfig, ContactApiError, ContactPayload};
use ofo_shell::{ContactForm, ContactSubmitter, EnvConfig, SubmissionError};

/// Sends completed contact forms to the relay over HTTP.
#[derive(Debug)]
pub struct RelaySubmitter {
    client: ContactApiClient,
}

impl RelaySubmitter {
    pub fn new(client: ContactApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &EnvConfig) -> Result<Self, ContactApiError> {
        let api_config = ContactApiConfig::new(config.contact_endpoint.clone())
            .with_timeout(config.contact_timeout);
        ContactApiClient::new(api_config).map(Self::new)
    }

    pub fn client(&self) -> &ContactApiClient {
        &self.client
    }
}

impl ContactSubmitter for RelaySubmitter {
    async fn submit(&self, form: &ContactForm) -> Result<(), SubmissionError> {
        self.client
            .submit(&payload_for(form))
            .await
            .map_err(submission_error)
    }
}

pub fn payload_for(form: &ContactForm) -> ContactPayload {
    ContactPayload::new(
        form.name.clone(),
        form.email.clone(),
        form.message.clone(),
    )
}

pub fn submission_error(err: ContactApiError) -> SubmissionError {
    match err {
        ContactApiError::Status(status, message) => SubmissionError::Rejected {
            status: status.as_u16(),
            message,
        },
        ContactApiError::Request(err) => SubmissionError::Transport(err.to_string()),
        ContactApiError::InvalidPayload(message)
        | ContactApiError::InvalidEndpoint(message)
        | ContactApiError::InvalidHeader(message) => SubmissionError::Invalid(message),
        ContactApiError::Serde(err) => SubmissionError::Transport(err.to_string()),
    }
}
