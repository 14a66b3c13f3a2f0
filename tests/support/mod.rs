#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ofo_shell::content::portfolio;
use ofo_shell::{
    ContactForm, ContactSubmitter, DisplaySurface, Identity, Key, KeyEvent, MemorySurface, Shell,
    SoundCue, SubmissionError,
};

pub const PROMPT: &str = "operator@owenofarrell:~$";

pub struct RecordingSubmitter {
    submissions: RefCell<Vec<ContactForm>>,
    outcome: Result<(), SubmissionError>,
}

impl RecordingSubmitter {
    pub fn succeeding() -> Self {
        Self::with_outcome(Ok(()))
    }

    pub fn failing(error: SubmissionError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: Result<(), SubmissionError>) -> Self {
        Self {
            submissions: RefCell::new(Vec::new()),
            outcome,
        }
    }

    pub fn submissions(&self) -> Vec<ContactForm> {
        self.submissions.borrow().clone()
    }
}

impl ContactSubmitter for RecordingSubmitter {
    async fn submit(&self, form: &ContactForm) -> Result<(), SubmissionError> {
        self.submissions.borrow_mut().push(form.clone());
        self.outcome.clone()
    }
}

/// Counts cues; clones share the counters.
#[derive(Clone, Default)]
pub struct CountingCue {
    pub startups: Arc<AtomicUsize>,
    pub clicks: Arc<AtomicUsize>,
}

impl CountingCue {
    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }

    pub fn startups(&self) -> usize {
        self.startups.load(Ordering::SeqCst)
    }
}

impl SoundCue for CountingCue {
    fn startup(&mut self, _out: &mut dyn DisplaySurface) {
        self.startups.fetch_add(1, Ordering::SeqCst);
    }

    fn key_click(&mut self, _out: &mut dyn DisplaySurface) {
        self.clicks.fetch_add(1, Ordering::SeqCst);
    }
}

pub type TestShell = Shell<MemorySurface, RecordingSubmitter>;

/// A shell that has not booted yet; input is still disabled.
pub fn unbooted_shell(submitter: RecordingSubmitter) -> TestShell {
    Shell::new(
        MemorySurface::new(),
        submitter,
        portfolio().expect("portfolio builds"),
        Identity::new("operator", "owenofarrell"),
    )
}

/// A shell with input enabled and no boot output.
pub fn ready_shell(submitter: RecordingSubmitter) -> TestShell {
    let mut shell = unbooted_shell(submitter);
    shell.skip_boot();
    shell
}

pub async fn press(shell: &mut TestShell, key: Key) {
    shell.handle_key(KeyEvent::press(key)).await;
}

/// Types `text` key by key, then presses Enter.
pub async fn enter_line(shell: &mut TestShell, text: &str) {
    for ch in text.chars() {
        press(shell, Key::Char(ch)).await;
    }
    press(shell, Key::Enter).await;
}

pub fn buffer(shell: &TestShell) -> &str {
    shell.state().buffer.as_str()
}
