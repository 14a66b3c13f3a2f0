//! Transport-only client for the portfolio contact relay.
//!
//! The relay accepts one JSON `POST` of `{name, email, message}` and answers
//! 200 on delivery, 400 on missing fields, 405 on other methods and 500 when
//! the mail hand-off fails. This crate builds and sends that request; it never
//! retries.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod payload;

pub use client::ContactApiClient;
pub use config::ContactApiConfig;
pub use endpoint::validate_endpoint;
pub use error::ContactApiError;
pub use payload::ContactPayload;
pub use reqwest::StatusCode;
