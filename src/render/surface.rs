//! Display surface boundary.

use crate::render::line::OutputLine;

/// Identifies an appended line until the next [`DisplaySurface::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(pub u64);

/// The live input row: prompt plus the echoed edit buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLine {
    pub prompt: String,
    pub buffer: String,
}

impl PromptLine {
    pub fn new(prompt: impl Into<String>, buffer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: buffer.into(),
        }
    }
}

/// Append-only ordered list of rendered lines, kept scrolled to the newest.
pub trait DisplaySurface {
    /// Appends a line and scrolls to it.
    fn append(&mut self, line: OutputLine) -> LineId;

    /// Extends an appended line by one character. Stale ids are ignored.
    fn push_char(&mut self, id: LineId, ch: char);

    fn clear(&mut self);

    fn set_visible(&mut self, visible: bool);

    /// Shows the input row, or hides it while input is disabled.
    fn set_prompt(&mut self, prompt: Option<PromptLine>);

    /// Ambient animation tick; independent of command execution.
    fn tick(&mut self) {}

    /// Audible cue. Surfaces without sound ignore it.
    fn bell(&mut self) {}
}

/// In-memory surface for tests and headless use.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    lines: Vec<(LineId, OutputLine)>,
    next_id: u64,
    visible: bool,
    prompt: Option<PromptLine>,
    scrolled_to: usize,
    clear_count: usize,
    bell_count: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            next_id: 0,
            visible: true,
            prompt: None,
            scrolled_to: 0,
            clear_count: 0,
            bell_count: 0,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter().map(|(_, line)| line)
    }

    /// Visible text of every line, in order.
    pub fn texts(&self) -> Vec<String> {
        self.lines().map(OutputLine::text).collect()
    }

    pub fn last(&self) -> Option<&OutputLine> {
        self.lines.last().map(|(_, line)| line)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn prompt(&self) -> Option<&PromptLine> {
        self.prompt.as_ref()
    }

    /// Index the surface is scrolled to; equals the line count after every append.
    pub fn scrolled_to(&self) -> usize {
        self.scrolled_to
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    pub fn bell_count(&self) -> usize {
        self.bell_count
    }
}

impl DisplaySurface for MemorySurface {
    fn append(&mut self, line: OutputLine) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.push((id, line));
        self.scrolled_to = self.lines.len();
        id
    }

    fn push_char(&mut self, id: LineId, ch: char) {
        if let Some((_, line)) = self.lines.iter_mut().find(|(line_id, _)| *line_id == id) {
            line.push_char(ch);
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.scrolled_to = 0;
        self.clear_count += 1;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_prompt(&mut self, prompt: Option<PromptLine>) {
        self.prompt = prompt;
    }

    fn bell(&mut self) {
        self.bell_count += 1;
    }
}
