//! Terminal host for ofo-shell.
//!
//! ## Environment
//!
//! - `OFO_USER` / `OFO_HOST` override the prompt identity.
//! - `OFO_CONTACT_ENDPOINT` points contact submissions at a relay; blank keeps the default.
//! - `OFO_CONTACT_TIMEOUT_SEC` bounds each submission; must be > 0.
//! - `OFO_SOUND=1` rings the terminal bell for startup and key clicks.
//! - `OFO_SKIP_BOOT=1` starts at the prompt without the boot animation.
//! - `OFO_LOG=<path>` writes tracing output to a file; stdout is the terminal.
//!
//! Contract: the contact relay is called at most once per completed form. Failures are
//! reported in the transcript and never retried.

pub mod app;
pub mod submitter;
