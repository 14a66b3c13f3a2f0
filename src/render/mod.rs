//! Output pipeline: structured lines, surfaces, and the line renderer.

pub mod ansi;
pub mod line;
pub mod renderer;
pub mod surface;

pub use ansi::AnsiSurface;
pub use line::{escape_text, LineKind, OutputLine, Span, Style};
pub use renderer::{CancellationSignal, LineRenderer, TypeOutcome};
pub use surface::{DisplaySurface, LineId, MemorySurface, PromptLine};
