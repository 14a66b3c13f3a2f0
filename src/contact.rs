//! Guided contact form: `Name -> Email -> Message -> Submitting`.
//!
//! Progress lives inside `Mode::GuidedForm`, so leaving the form drops the
//! step and the partial draft together.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::error::{ShellError, SubmissionError};
use crate::render::{DisplaySurface, OutputLine, Style};

pub const INTRO: &str = "Let's talk. Answer three questions; Ctrl+C or Esc cancels.";
pub const SENDING: &str = "Sending...";
pub const CANCELLED: &str = "Contact form cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Name,
    Email,
    Message,
}

impl FormStep {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Name => "Name:",
            Self::Email => "Email:",
            Self::Message => "Message:",
        }
    }

    fn field(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Message => "Message",
        }
    }
}

impl fmt::Display for FormStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Completed submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerRejected {
    #[error("{0} cannot be empty.")]
    Empty(FormStep),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next(FormStep),
    Submit(ContactForm),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormProgress {
    step: FormStep,
    draft: ContactDraft,
}

impl Default for FormProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl FormProgress {
    pub fn new() -> Self {
        Self {
            step: FormStep::Name,
            draft: ContactDraft::default(),
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    /// Stores the trimmed answer for the current step. A blank answer is
    /// rejected and leaves the step and draft untouched.
    pub fn answer(&mut self, raw: &str) -> Result<Advance, AnswerRejected> {
        let answer = raw.trim();
        if answer.is_empty() {
            return Err(AnswerRejected::Empty(self.step));
        }

        match self.step {
            FormStep::Name => {
                self.draft.name = Some(answer.to_string());
                self.step = FormStep::Email;
                Ok(Advance::Next(FormStep::Email))
            }
            FormStep::Email => {
                self.draft.email = Some(answer.to_string());
                self.step = FormStep::Message;
                Ok(Advance::Next(FormStep::Message))
            }
            FormStep::Message => Ok(Advance::Submit(ContactForm {
                name: self.draft.name.clone().unwrap_or_default(),
                email: self.draft.email.clone().unwrap_or_default(),
                message: answer.to_string(),
            })),
        }
    }
}

/// Outbound transport for a completed form. Called exactly once per form.
pub trait ContactSubmitter {
    fn submit(&self, form: &ContactForm) -> impl Future<Output = Result<(), SubmissionError>>;
}

/// Prints `Sending...`, submits once and prints the outcome.
pub async fn submit_form<C: ContactSubmitter>(
    out: &mut dyn DisplaySurface,
    submitter: &C,
    form: ContactForm,
) {
    out.append(OutputLine::styled(SENDING, Style::Dim));
    match submitter.submit(&form).await {
        Ok(()) => {
            tracing::info!("contact form submitted");
            out.append(OutputLine::styled(
                format!("Message sent. Thanks, {}!", form.name),
                Style::Success,
            ));
        }
        Err(err) => {
            tracing::warn!(error = %err, "contact form submission failed");
            out.append(OutputLine::error(ShellError::from(err).to_string()));
        }
    }
}
