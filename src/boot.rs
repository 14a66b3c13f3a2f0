//! Boot animation and input gating.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::render::{DisplaySurface, LineRenderer};
use crate::sound::SoundCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootLine {
    pub text: &'static str,
    pub char_delay: Duration,
    pub pause_after: Duration,
}

impl BootLine {
    /// Characters are revealed four times faster than the pause after the line.
    pub const fn new(text: &'static str, delay_ms: u64) -> Self {
        Self {
            text,
            char_delay: Duration::from_millis(delay_ms / 4),
            pause_after: Duration::from_millis(delay_ms),
        }
    }
}

pub const BOOT_LINES: [BootLine; 5] = [
    BootLine::new("CRITICAL_SUBSYSTEM_LINK ESTABLISHED...", 100),
    BootLine::new("MOUNTING /dev/consciousness... OK", 200),
    BootLine::new("INITIALIZING OFO-SHELL v2.3.7...", 150),
    BootLine::new("Welcome, operator. System ready.", 100),
    BootLine::new("Type 'help' to interface.", 50),
];

/// Shared open/closed flag for key input. Clones observe the same state, so
/// the stdin reader can drop keys while the shell is busy booting.
#[derive(Debug, Clone, Default)]
pub struct InputGate(Arc<AtomicBool>);

impl InputGate {
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set_open(&self, open: bool) {
        self.0.store(open, Ordering::Release);
    }
}

/// Types each line in order, waiting its pause before the next one.
pub async fn play<S: DisplaySurface>(
    renderer: &mut LineRenderer<S>,
    sound: &mut dyn SoundCue,
    lines: &[BootLine],
) {
    for line in lines {
        renderer
            .type_line(line.text, line.char_delay, &mut |_, out| sound.key_click(out))
            .await;
        tokio::time::sleep(line.pause_after).await;
    }
}
