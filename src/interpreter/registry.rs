//! Ordered command table.

use time::OffsetDateTime;

use crate::error::ShellError;
use crate::render::{DisplaySurface, OutputLine};
use crate::session::SessionState;
use crate::vfs::Vfs;

/// Source of the current time for `date`.
pub type Clock = fn() -> OffsetDateTime;

/// Work the shell performs after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    Reboot,
    Matrix,
}

pub struct CommandContext<'a> {
    pub state: &'a mut SessionState,
    pub vfs: &'a Vfs,
    pub out: &'a mut dyn DisplaySurface,
    pub commands: &'a CommandRegistry,
    pub clock: Clock,
}

impl CommandContext<'_> {
    pub fn print_line(&mut self, line: OutputLine) {
        self.out.append(line);
    }

    pub fn print(&mut self, text: impl Into<String>) {
        self.print_line(OutputLine::plain(text));
    }
}

pub trait CommandHandler {
    /// One-line description shown by `help`.
    fn summary(&self) -> &'static str;
    fn run(&self, argument: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError>;
}

type HandlerFn = fn(&str, &mut CommandContext<'_>) -> Result<Effect, ShellError>;

/// Handler backed by a plain function.
pub struct Builtin {
    summary: &'static str,
    run: HandlerFn,
}

impl Builtin {
    pub const fn new(summary: &'static str, run: HandlerFn) -> Self {
        Self { summary, run }
    }
}

impl CommandHandler for Builtin {
    fn summary(&self) -> &'static str {
        self.summary
    }

    fn run(&self, argument: &str, ctx: &mut CommandContext<'_>) -> Result<Effect, ShellError> {
        (self.run)(argument, ctx)
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<(&'static str, Box<dyn CommandHandler>)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, replacing an earlier handler with the same name in place.
    pub fn register(&mut self, name: &'static str, handler: impl CommandHandler + 'static) {
        let handler: Box<dyn CommandHandler> = Box::new(handler);
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = handler,
            None => self.entries.push((name, handler)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, handler)| handler.as_ref())
    }

    /// `(name, summary)` pairs in registration order.
    pub fn summaries(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries
            .iter()
            .map(|(name, handler)| (*name, handler.summary()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
