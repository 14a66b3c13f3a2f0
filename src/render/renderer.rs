//! Line renderer: instant and animated output onto a [`DisplaySurface`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::render::line::{LineKind, OutputLine};
use crate::render::surface::{DisplaySurface, PromptLine};

/// Cancellation signal shared with an in-flight [`LineRenderer::type_line_with_cancel`].
pub type CancellationSignal = Arc<AtomicBool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOutcome {
    Completed,
    /// The rest of the text was revealed at once.
    Cancelled,
}

#[derive(Debug)]
pub struct LineRenderer<S> {
    surface: S,
}

impl<S: DisplaySurface> LineRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn print_line(&mut self, line: OutputLine) {
        self.surface.append(line);
    }

    pub fn print(&mut self, text: impl Into<String>) {
        self.print_line(OutputLine::plain(text));
    }

    pub fn print_error(&mut self, text: impl Into<String>) {
        self.print_line(OutputLine::error(text));
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.surface.set_visible(visible);
    }

    pub fn set_prompt(&mut self, prompt: Option<PromptLine>) {
        self.surface.set_prompt(prompt);
    }

    /// Reveals `text` one character at a time, calling `on_char` with the
    /// surface after each reveal and waiting `per_char_delay` between characters.
    pub async fn type_line(
        &mut self,
        text: &str,
        per_char_delay: Duration,
        on_char: &mut dyn FnMut(char, &mut dyn DisplaySurface),
    ) -> TypeOutcome {
        self.type_line_with_cancel(text, per_char_delay, on_char, None)
            .await
    }

    pub async fn type_line_with_cancel(
        &mut self,
        text: &str,
        per_char_delay: Duration,
        on_char: &mut dyn FnMut(char, &mut dyn DisplaySurface),
        cancel: Option<&CancellationSignal>,
    ) -> TypeOutcome {
        let id = self
            .surface
            .append(OutputLine::new(LineKind::Typed, Vec::new()));
        let mut chars = text.chars();

        while let Some(ch) = chars.next() {
            if is_cancelled(cancel) {
                self.surface.push_char(id, ch);
                for rest in chars.by_ref() {
                    self.surface.push_char(id, rest);
                }
                return TypeOutcome::Cancelled;
            }

            self.surface.push_char(id, ch);
            on_char(ch, &mut self.surface);

            if per_char_delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(per_char_delay).await;
            }
        }

        TypeOutcome::Completed
    }
}

fn is_cancelled(cancel: Option<&CancellationSignal>) -> bool {
    cancel.is_some_and(|signal| signal.load(Ordering::Acquire))
}
