//! Audio cues.
//!
//! A terminal has no audio channel beyond the bell, so the audible cues are
//! bells rung through the display surface. Key clicks are throttled; a burst of
//! typed characters rings once.

use std::time::Duration;

use tokio::time::Instant;

use crate::render::DisplaySurface;

const KEY_CLICK_MIN_GAP: Duration = Duration::from_millis(80);

pub trait SoundCue {
    fn startup(&mut self, out: &mut dyn DisplaySurface);
    fn key_click(&mut self, out: &mut dyn DisplaySurface);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundCue for Silent {
    fn startup(&mut self, _out: &mut dyn DisplaySurface) {}

    fn key_click(&mut self, _out: &mut dyn DisplaySurface) {}
}

#[derive(Debug, Default, Clone)]
pub struct TerminalBell {
    last_click: Option<Instant>,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SoundCue for TerminalBell {
    fn startup(&mut self, out: &mut dyn DisplaySurface) {
        out.bell();
    }

    fn key_click(&mut self, out: &mut dyn DisplaySurface) {
        let now = Instant::now();
        if self
            .last_click
            .is_some_and(|last| now.duration_since(last) < KEY_CLICK_MIN_GAP)
        {
            return;
        }
        self.last_click = Some(now);
        out.bell();
    }
}

/// Picks the cue implementation for the `OFO_SOUND` setting.
pub fn from_config(enabled: bool) -> Box<dyn SoundCue> {
    if enabled {
        Box::new(TerminalBell::new())
    } else {
        Box::new(Silent)
    }
}
