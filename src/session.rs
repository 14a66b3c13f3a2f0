//! Per-process session state: working directory, history, input mode.

use unicode_segmentation::UnicodeSegmentation;

use crate::contact::FormProgress;
use crate::vfs::VfsPath;

/// Prompt identity, `<user>@<host>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }
}

/// Result of a history navigation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Load this entry into the buffer.
    Entry(&'a str),
    /// Navigated past the newest entry; clear the buffer.
    Blank,
    Unchanged,
}

/// Submitted lines, oldest first. `cursor == None` is the one-past-end
/// position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputHistory {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl InputHistory {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Records a non-empty entry and resets navigation.
    pub fn record(&mut self, entry: &str) {
        if !entry.is_empty() {
            self.entries.push(entry.to_string());
        }
        self.cursor = None;
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn previous(&mut self) -> Recall<'_> {
        let index = match self.cursor {
            None if self.entries.is_empty() => return Recall::Unchanged,
            None => self.entries.len() - 1,
            Some(0) => return Recall::Unchanged,
            Some(index) => index - 1,
        };
        self.cursor = Some(index);
        Recall::Entry(&self.entries[index])
    }

    pub fn next(&mut self) -> Recall<'_> {
        match self.cursor {
            Some(index) if index + 1 < self.entries.len() => {
                self.cursor = Some(index + 1);
                Recall::Entry(&self.entries[index + 1])
            }
            _ => {
                self.cursor = None;
                Recall::Blank
            }
        }
    }
}

/// The live edit line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Removes the last grapheme cluster. Returns `false` when already empty.
    pub fn backspace(&mut self) -> bool {
        match self.text.grapheme_indices(true).next_back() {
            Some((index, _)) => {
                self.text.truncate(index);
                true
            }
            None => false,
        }
    }

    pub fn replace(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    GuidedForm(FormProgress),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub path: VfsPath,
    pub history: InputHistory,
    pub mode: Mode,
    pub buffer: InputBuffer,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_form(&self) -> bool {
        matches!(self.mode, Mode::GuidedForm(_))
    }

    /// Leaves the guided form, dropping its progress.
    pub fn reset_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// `<user>@<host>:<path>$` in Normal mode, else the form step's prompt.
    pub fn prompt(&self, identity: &Identity) -> String {
        match &self.mode {
            Mode::Normal => format!("{}@{}:{}$", identity.user, identity.host, self.path),
            Mode::GuidedForm(progress) => progress.step().prompt().to_string(),
        }
    }
}
