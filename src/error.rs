//! Error taxonomy for the emulator.
//!
//! Every variant renders as exactly one user-visible line; the session is
//! never left in a half-mutated state when one is returned.

use thiserror::Error;

use crate::vfs::VfsError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("bash: command not found: {0}")]
    CommandNotFound(String),

    #[error("{command}: missing operand")]
    MissingOperand { command: &'static str },

    #[error("{command}: {target}: No such file or directory")]
    NoSuchPath {
        command: &'static str,
        target: String,
    },

    #[error("{command}: {target}: Is a directory")]
    IsADirectory {
        command: &'static str,
        target: String,
    },

    #[error("{command}: {file} is malformed: {reason}")]
    MalformedContent {
        command: &'static str,
        file: &'static str,
        reason: String,
    },

    #[error("Failed to send message: {0}")]
    Submission(#[from] SubmissionError),
}

impl ShellError {
    /// Maps a filesystem lookup failure onto the command that triggered it.
    pub fn from_vfs(command: &'static str, target: &str, error: VfsError) -> Self {
        match error {
            VfsError::IsDirectory { .. } => Self::IsADirectory {
                command,
                target: target.to_string(),
            },
            VfsError::NotFound { .. } | VfsError::DuplicateName { .. } => Self::NoSuchPath {
                command,
                target: target.to_string(),
            },
        }
    }
}

/// Failure of the outbound contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    Invalid(String),
}
