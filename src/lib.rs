//! ofo-shell: a faux terminal for a personal portfolio.
//!
//! Invariant: single output gate; only `core::output::OutputGate::flush(..)` writes to the
//! terminal.
//!
//! # Public API Overview
//! - Drive the emulator through [`Shell`]: feed it [`KeyEvent`]s, let it boot, fire its
//!   deferred timers.
//! - Output goes to a [`DisplaySurface`]: [`MemorySurface`] for tests, [`AnsiSurface`] over a
//!   [`Terminal`] for the real thing.
//! - Contact submissions leave through a [`ContactSubmitter`] supplied by the host.
//! - The portfolio tree is a read-only [`Vfs`] built once by [`content::portfolio`].

pub mod boot;
pub mod config;
pub mod contact;
pub mod content;
pub mod core;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod platform;
pub mod render;
pub mod session;
pub mod shell;
pub mod sound;
pub mod vfs;

/// Emulator entry point.
pub use crate::shell::{Shell, MATRIX_DURATION};

/// Boot animation.
pub use crate::boot::{BootLine, InputGate, BOOT_LINES};

/// Contact form and its outbound boundary.
pub use crate::contact::{ContactForm, ContactSubmitter, FormProgress, FormStep};

/// Errors.
pub use crate::error::{ShellError, SubmissionError};

/// Command dispatch.
pub use crate::interpreter::{
    parse_command, Command, CommandHandler, CommandRegistry, Effect, Interpreter,
};

/// Output lines and surfaces.
pub use crate::render::{
    AnsiSurface, DisplaySurface, LineKind, LineRenderer, MemorySurface, OutputLine, PromptLine,
    Span, Style,
};

/// Session state.
pub use crate::session::{Identity, InputBuffer, InputHistory, Mode, SessionState};

/// Sound cues.
pub use crate::sound::{Silent, SoundCue, TerminalBell};

/// Virtual filesystem.
pub use crate::vfs::{Node, NodeKind, Vfs, VfsBuilder, VfsError, VfsPath};

/// Keyboard input parsing.
pub use crate::core::input::{parse_keys, Key, KeyEvent, KeyEventType};

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::Terminal;
#[cfg(unix)]
pub use crate::platform::{install_signal_handlers, ProcessTerminal, SignalHookGuard};

/// Environment configuration.
pub use crate::config::EnvConfig;
