//! Inline ANSI rendering of the display surface.
//!
//! Layout invariant: committed lines sit above the cursor row; the cursor row
//! holds either the live prompt or an open typed line that is still being
//! revealed. Hiding the surface switches to the alternate screen, so the main
//! screen (and its scrollback) comes back on show unless it was cleared while
//! hidden. Only the open typed line and the hidden backlog are kept in memory.

use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;
use crate::render::line::{escape_text, LineKind, OutputLine, Span, Style};
use crate::render::surface::{DisplaySurface, LineId, PromptLine};

const RESET: &str = "\x1b[0m";
const RAIN_GLYPHS: &[char] = &[
    'ｱ', 'ｲ', 'ｳ', 'ｴ', 'ｵ', 'ｶ', 'ｷ', 'ｸ', 'ｹ', 'ｺ', '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', 'Z', ':', '.', '=', '*', '+', '<', '>',
];
const RAIN_TRAIL: u64 = 6;

pub struct AnsiSurface<T: Terminal> {
    terminal: T,
    gate: OutputGate,
    next_id: u64,
    visible: bool,
    hidden_backlog: Vec<(LineId, OutputLine)>,
    clear_pending: bool,
    prompt: Option<PromptLine>,
    open_line: Option<LineId>,
    cursor_shown: bool,
    rain_frame: u64,
}

impl<T: Terminal> AnsiSurface<T> {
    pub fn new(terminal: T) -> Self {
        Self {
            terminal,
            gate: OutputGate::new(),
            next_id: 0,
            visible: true,
            hidden_backlog: Vec::new(),
            clear_pending: false,
            prompt: None,
            open_line: None,
            cursor_shown: true,
            rain_frame: 0,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn into_terminal(self) -> T {
        self.terminal
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn close_open_line(&mut self) {
        if self.open_line.take().is_some() {
            self.gate.push(TerminalCmd::BytesStatic("\r\n"));
        }
    }

    fn commit_line(&mut self, id: LineId, line: &OutputLine) {
        let rendered = render_line(line);
        let typed = line.kind == LineKind::Typed;

        self.close_open_line();
        self.gate.push(TerminalCmd::ClearRow);
        self.gate.push(TerminalCmd::Bytes(rendered));
        if typed {
            self.open_line = Some(id);
        } else {
            self.gate.push(TerminalCmd::BytesStatic("\r\n"));
            self.draw_prompt();
        }
    }

    fn draw_prompt(&mut self) {
        if self.open_line.is_some() {
            return;
        }
        self.gate.push(TerminalCmd::ClearRow);
        if let Some(prompt) = self.prompt.as_ref() {
            self.gate.push(TerminalCmd::Bytes(render_prompt(prompt)));
        }
    }

    fn draw_rain(&mut self) {
        let columns = u64::from(self.terminal.columns().max(1));
        let rows = u64::from(self.terminal.rows().max(1));
        let frame = self.rain_frame;
        let mut out = String::from("\x1b[H");

        for row in 0..rows {
            for column in 0..columns {
                if column % 2 == 1 {
                    out.push(' ');
                    continue;
                }
                let offset = column.wrapping_mul(2_654_435_761) % (rows + RAIN_TRAIL);
                let head = (offset + frame) % (rows + RAIN_TRAIL);
                if row > head || head - row > RAIN_TRAIL {
                    out.push(' ');
                    continue;
                }
                let glyph_index = (column * 31 + row * 17 + frame) as usize % RAIN_GLYPHS.len();
                let color = if row == head { "\x1b[97m" } else { "\x1b[32m" };
                out.push_str(color);
                out.push(RAIN_GLYPHS[glyph_index]);
                out.push_str(RESET);
            }
            if row + 1 < rows {
                out.push_str("\r\n");
            }
        }

        self.gate.push(TerminalCmd::Bytes(out));
        self.rain_frame = self.rain_frame.wrapping_add(1);
    }

    fn flush(&mut self) {
        self.gate.flush(&mut self.terminal);
    }
}

impl<T: Terminal> DisplaySurface for AnsiSurface<T> {
    fn append(&mut self, line: OutputLine) -> LineId {
        let id = LineId(self.next_id);
        self.next_id += 1;

        if self.visible {
            self.commit_line(id, &line);
            self.flush();
        } else {
            self.hidden_backlog.push((id, line));
        }
        id
    }

    fn push_char(&mut self, id: LineId, ch: char) {
        if self.visible {
            if self.open_line == Some(id) {
                let mut buf = [0u8; 4];
                let text = escape_text(ch.encode_utf8(&mut buf)).into_owned();
                self.gate.push(TerminalCmd::Bytes(text.replace('\n', "\r\n")));
                self.flush();
            }
        } else if let Some((_, line)) = self
            .hidden_backlog
            .iter_mut()
            .rev()
            .find(|(line_id, _)| *line_id == id)
        {
            line.push_char(ch);
        }
    }

    fn clear(&mut self) {
        self.hidden_backlog.clear();
        self.open_line = None;
        if self.visible {
            self.gate.push(TerminalCmd::ClearScreen);
            self.draw_prompt();
            self.flush();
        } else {
            self.clear_pending = true;
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }

        if visible {
            self.visible = true;
            self.gate.push(TerminalCmd::LeaveAltScreen);
            if std::mem::take(&mut self.clear_pending) {
                self.gate.push(TerminalCmd::ClearScreen);
            }
            if self.cursor_shown {
                self.gate.push(TerminalCmd::ShowCursor);
            }
            for (id, line) in std::mem::take(&mut self.hidden_backlog) {
                self.commit_line(id, &line);
            }
            self.draw_prompt();
        } else {
            self.close_open_line();
            self.visible = false;
            self.gate.push(TerminalCmd::EnterAltScreen);
            self.gate.push(TerminalCmd::HideCursor);
            self.draw_rain();
        }
        self.flush();
    }

    fn set_prompt(&mut self, prompt: Option<PromptLine>) {
        self.prompt = prompt;
        if self.visible {
            if self.prompt.is_some() {
                self.close_open_line();
            }
            self.draw_prompt();
            self.flush();
        }
    }

    fn tick(&mut self) {
        if self.visible {
            self.cursor_shown = !self.cursor_shown;
            self.gate.push(if self.cursor_shown {
                TerminalCmd::ShowCursor
            } else {
                TerminalCmd::HideCursor
            });
        } else {
            self.draw_rain();
        }
        self.flush();
    }

    fn bell(&mut self) {
        self.gate.push(TerminalCmd::Bell);
        self.flush();
    }
}

fn sgr(style: Style) -> &'static str {
    match style {
        Style::Plain => "",
        Style::Accent => "\x1b[36m",
        Style::Directory => "\x1b[1;34m",
        Style::Dim => "\x1b[2m",
        Style::Error => "\x1b[31m",
        Style::Success => "\x1b[32m",
        Style::Prompt => "\x1b[1;32m",
    }
}

fn push_styled(out: &mut String, text: &str, style: Style) {
    let escaped = escape_text(text);
    let code = sgr(style);
    if code.is_empty() {
        out.push_str(&escaped);
    } else {
        out.push_str(code);
        out.push_str(&escaped);
        out.push_str(RESET);
    }
}

/// Renders one line to ANSI text without a trailing newline.
pub fn render_line(line: &OutputLine) -> String {
    let mut out = String::new();
    for span in &line.spans {
        match span {
            Span::Text { text, style } => {
                let style = match (line.kind, style) {
                    (LineKind::Error, Style::Plain) => Style::Error,
                    (_, style) => *style,
                };
                push_styled(&mut out, text, style);
            }
            Span::Action { label, command } => {
                out.push_str("\x1b[4;36m");
                out.push_str(&escape_text(label));
                out.push_str(RESET);
                push_styled(&mut out, &format!(" ({command})"), Style::Dim);
            }
        }
    }
    out.replace('\n', "\r\n")
}

pub fn render_prompt(prompt: &PromptLine) -> String {
    let mut out = String::new();
    push_styled(&mut out, &prompt.prompt, Style::Prompt);
    out.push(' ');
    out.push_str(&escape_text(&prompt.buffer));
    out
}
