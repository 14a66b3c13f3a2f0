//! Structured output lines.
//!
//! Lines carry data (kind + spans), never pre-rendered markup. Surfaces decide
//! presentation and run every text span through [`escape_text`], so untrusted
//! input (contact answers, unknown command names) cannot smuggle control
//! sequences onto the display.

use std::borrow::Cow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    #[default]
    Plain,
    Accent,
    Directory,
    Dim,
    Error,
    Success,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text { text: String, style: Style },
    /// Actionable link; activating it runs `command` as if typed.
    Action { label: String, command: String },
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, Style::Plain)
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::Text {
            text: text.into(),
            style,
        }
    }

    pub fn action(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self::Action {
            label: label.into(),
            command: command.into(),
        }
    }

    /// Visible text of the span (the label for actions).
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text, .. } => text,
            Self::Action { label, .. } => label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Prompt + submitted input.
    Echo,
    Plain,
    Error,
    /// Content shown with its line breaks and spacing intact.
    Preformatted,
    /// Revealed character by character.
    Typed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub kind: LineKind,
    pub spans: Vec<Span>,
}

impl OutputLine {
    pub fn new(kind: LineKind, spans: Vec<Span>) -> Self {
        Self { kind, spans }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(LineKind::Plain, vec![Span::plain(text)])
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self::new(LineKind::Plain, vec![Span::styled(text, style)])
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(LineKind::Error, vec![Span::styled(text, Style::Error)])
    }

    pub fn preformatted(text: impl Into<String>) -> Self {
        Self::new(LineKind::Preformatted, vec![Span::plain(text)])
    }

    pub fn echo(prompt: impl Into<String>, input: impl Into<String>) -> Self {
        let input = input.into();
        let mut spans = vec![Span::styled(prompt, Style::Prompt)];
        if !input.is_empty() {
            spans.push(Span::plain(format!(" {input}")));
        }
        Self::new(LineKind::Echo, spans)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    /// Appends one revealed character to the trailing text span.
    pub fn push_char(&mut self, ch: char) {
        match self.spans.last_mut() {
            Some(Span::Text { text, .. }) => text.push(ch),
            _ => self.spans.push(Span::plain(ch.to_string())),
        }
    }

    /// Concatenated visible text.
    pub fn text(&self) -> String {
        self.spans.iter().map(Span::text).collect()
    }

    /// Commands of the actionable spans on this line.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().filter_map(|span| match span {
            Span::Action { command, .. } => Some(command.as_str()),
            Span::Text { .. } => None,
        })
    }
}

/// Makes control characters visible; newlines and tabs pass through.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        if !needs_escape(ch) {
            out.push(ch);
            continue;
        }
        match ch as u32 {
            code @ 0x00..=0x1f => {
                out.push('^');
                out.push(char::from(code as u8 + 0x40));
            }
            0x7f => out.push_str("^?"),
            code => out.push_str(&format!("<U+{code:04X}>")),
        }
    }
    Cow::Owned(out)
}

fn needs_escape(ch: char) -> bool {
    ch != '\n' && ch != '\t' && ch.is_control()
}

#[cfg(test)]
mod tests {
    use super::{escape_text, LineKind, OutputLine, Span, Style};

    #[test]
    fn escape_leaves_plain_text_borrowed() {
        assert!(matches!(
            escape_text("hello\tworld\n"),
            std::borrow::Cow::Borrowed(_)
        ));
    }

    #[test]
    fn escape_neutralizes_terminal_control_sequences() {
        assert_eq!(escape_text("\x1b[2Jboom"), "^[[2Jboom");
        assert_eq!(escape_text("bell\x07"), "bell^G");
        assert_eq!(escape_text("del\x7f"), "del^?");
        assert_eq!(escape_text("csi\u{9b}"), "csi<U+009B>");
    }

    #[test]
    fn echo_line_omits_trailing_space_for_empty_input() {
        let echo = OutputLine::echo("operator@host:~$", "");
        assert_eq!(echo.text(), "operator@host:~$");
        assert_eq!(echo.kind, LineKind::Echo);

        let echo = OutputLine::echo("operator@host:~$", "ls");
        assert_eq!(echo.text(), "operator@host:~$ ls");
    }

    #[test]
    fn push_char_extends_the_trailing_text_span() {
        let mut line = OutputLine::new(LineKind::Typed, Vec::new());
        line.push_char('o');
        line.push_char('k');
        assert_eq!(line.spans, vec![Span::plain("ok")]);

        let mut line = OutputLine::new(LineKind::Plain, vec![Span::action("x", "cat x")]);
        line.push_char('!');
        assert_eq!(line.text(), "x!");
    }

    #[test]
    fn actions_lists_link_commands() {
        let line = OutputLine::styled("> ", Style::Dim).with_span(Span::action(
            "ofo-shell.txt",
            "cat ~/projects/ofo-shell.txt",
        ));
        assert_eq!(
            line.actions().collect::<Vec<_>>(),
            vec!["cat ~/projects/ofo-shell.txt"]
        );
    }
}
