//! Typed terminal output commands and a single output gate.
//!
//! Invariant: all terminal writes from the emulator flow through
//! `OutputGate::flush(..)`.

use crate::core::terminal::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCmd {
    /// Already-escaped text and SGR sequences.
    Bytes(String),
    BytesStatic(&'static str),

    HideCursor,
    ShowCursor,
    /// Erase the current row and return to column 0.
    ClearRow,
    /// Erase the screen and scrollback, cursor home.
    ClearScreen,
    EnterAltScreen,
    LeaveAltScreen,
    Bell,

    /// Kitty keyboard protocol: disambiguate, event types, alternate keys, and
    /// every key as an escape code so text keys report repeats too.
    KittyEnable,
    KittyDisable,
}

impl TerminalCmd {
    pub fn bytes(data: impl Into<String>) -> Self {
        Self::Bytes(data.into())
    }
}

#[derive(Debug, Default)]
pub struct OutputGate {
    cmds: Vec<TerminalCmd>,
}

impl OutputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: TerminalCmd) {
        self.cmds.push(cmd);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Flush buffered commands to the terminal as one write.
    pub fn flush<T: Terminal>(&mut self, term: &mut T) {
        if self.cmds.is_empty() {
            return;
        }

        let mut out = String::new();
        for cmd in self.cmds.drain(..) {
            match cmd {
                TerminalCmd::Bytes(data) => out.push_str(&data),
                TerminalCmd::BytesStatic(data) => out.push_str(data),
                TerminalCmd::HideCursor => out.push_str("\x1b[?25l"),
                TerminalCmd::ShowCursor => out.push_str("\x1b[?25h"),
                TerminalCmd::ClearRow => out.push_str("\r\x1b[2K"),
                TerminalCmd::ClearScreen => out.push_str("\x1b[2J\x1b[3J\x1b[H"),
                TerminalCmd::EnterAltScreen => out.push_str("\x1b[?1049h\x1b[H"),
                TerminalCmd::LeaveAltScreen => out.push_str("\x1b[?1049l"),
                TerminalCmd::Bell => out.push('\x07'),
                TerminalCmd::KittyEnable => out.push_str("\x1b[>15u"),
                TerminalCmd::KittyDisable => out.push_str("\x1b[<u"),
            }
        }
        term.write(&out);
    }
}
