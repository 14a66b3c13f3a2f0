//! The emulator: routes keys to the interpreter or the contact form and
//! performs deferred effects.

use std::time::Duration;

use tokio::time::Instant;

use crate::boot::{self, BootLine, InputGate, BOOT_LINES};
use crate::contact::{self, Advance, ContactSubmitter, CANCELLED};
use crate::core::input::{Key, KeyEvent};
use crate::interpreter::{Clock, Effect, Interpreter};
use crate::render::{DisplaySurface, LineRenderer, OutputLine, PromptLine, Span, Style};
use crate::session::{Identity, Mode, Recall, SessionState};
use crate::sound::{Silent, SoundCue};
use crate::vfs::Vfs;

/// How long `matrix` keeps the output hidden.
pub const MATRIX_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timer {
    ShowOutput,
}

pub struct Shell<S: DisplaySurface, C: ContactSubmitter> {
    renderer: LineRenderer<S>,
    state: SessionState,
    vfs: Vfs,
    interpreter: Interpreter,
    identity: Identity,
    submitter: C,
    sound: Box<dyn SoundCue>,
    boot_lines: &'static [BootLine],
    gate: InputGate,
    enable_count: usize,
    boot_count: usize,
    timers: Vec<(Instant, Timer)>,
    exit_requested: bool,
}

impl<S: DisplaySurface, C: ContactSubmitter> Shell<S, C> {
    pub fn new(surface: S, submitter: C, vfs: Vfs, identity: Identity) -> Self {
        Self {
            renderer: LineRenderer::new(surface),
            state: SessionState::new(),
            vfs,
            interpreter: Interpreter::new(),
            identity,
            submitter,
            sound: Box::new(Silent),
            boot_lines: &BOOT_LINES,
            gate: InputGate::default(),
            enable_count: 0,
            boot_count: 0,
            timers: Vec::new(),
            exit_requested: false,
        }
    }

    pub fn with_sound(mut self, sound: Box<dyn SoundCue>) -> Self {
        self.sound = sound;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.interpreter = self.interpreter.with_clock(clock);
        self
    }

    pub fn with_boot_lines(mut self, lines: &'static [BootLine]) -> Self {
        self.boot_lines = lines;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        self.renderer.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.renderer.surface_mut()
    }

    pub fn submitter(&self) -> &C {
        &self.submitter
    }

    pub fn input_gate(&self) -> InputGate {
        self.gate.clone()
    }

    pub fn input_enabled(&self) -> bool {
        self.gate.is_open()
    }

    /// Times input has been re-enabled; once per boot.
    pub fn enable_count(&self) -> usize {
        self.enable_count
    }

    pub fn boot_count(&self) -> usize {
        self.boot_count
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Disables input, plays the boot animation, then enables input once.
    pub async fn boot(&mut self) {
        tracing::info!("boot sequence started");
        self.boot_count += 1;
        self.gate.set_open(false);
        self.renderer.set_prompt(None);
        self.sound.startup(self.renderer.surface_mut());

        boot::play(&mut self.renderer, self.sound.as_mut(), self.boot_lines).await;

        self.enable_input();
        tracing::info!("boot sequence finished");
    }

    /// Enables input without the animation.
    pub fn skip_boot(&mut self) {
        self.boot_count += 1;
        self.enable_input();
    }

    fn enable_input(&mut self) {
        self.gate.set_open(true);
        self.enable_count += 1;
        self.refresh_prompt();
    }

    pub async fn handle_key(&mut self, event: KeyEvent) {
        if !self.input_enabled() {
            tracing::debug!(key = ?event.key, "input disabled; key dropped");
            return;
        }

        match event.key {
            Key::Enter => {
                let raw = self.state.buffer.take();
                self.submit_line(&raw).await;
                return;
            }
            Key::Up if !self.state.in_form() => {
                if let Recall::Entry(entry) = self.state.history.previous() {
                    let entry = entry.to_string();
                    self.state.buffer.replace(&entry);
                }
            }
            Key::Down if !self.state.in_form() => match self.state.history.next() {
                Recall::Entry(entry) => {
                    let entry = entry.to_string();
                    self.state.buffer.replace(&entry);
                }
                Recall::Blank => self.state.buffer.clear(),
                Recall::Unchanged => {}
            },
            Key::Backspace => {
                self.state.buffer.backspace();
            }
            Key::Escape if self.state.in_form() => self.cancel_form(),
            Key::Interrupt => self.interrupt(),
            Key::EndOfInput => {
                if self.state.buffer.is_empty() && !self.state.in_form() {
                    self.exit_requested = true;
                }
            }
            Key::ClearScreen => self.renderer.clear(),
            Key::Char(ch) => {
                self.state.buffer.push(ch);
                if !event.is_repeat() {
                    self.sound.key_click(self.renderer.surface_mut());
                }
            }
            _ => {}
        }
        self.refresh_prompt();
    }

    /// Runs an actionable link's command as if it had been typed. An open
    /// contact form is cancelled first, so the command never becomes an answer.
    pub async fn activate(&mut self, command: &str) {
        if self.state.in_form() {
            self.cancel_form();
        }
        self.state.buffer.clear();
        self.submit_line(command).await;
    }

    /// Routes one submitted line to the contact form or the interpreter.
    pub async fn submit_line(&mut self, raw: &str) {
        let prompt = self.state.prompt(&self.identity);
        let line = raw.trim();
        self.renderer.print_line(OutputLine::echo(prompt, line));
        self.state.history.reset_cursor();

        let outcome = match &mut self.state.mode {
            Mode::GuidedForm(progress) => Some(progress.answer(line)),
            Mode::Normal => None,
        };

        match outcome {
            None => {
                self.state.history.record(line);
                let effect = self.interpreter.execute(
                    line,
                    &mut self.state,
                    &self.vfs,
                    self.renderer.surface_mut(),
                );
                self.apply(effect).await;
            }
            Some(Ok(Advance::Next(step))) => {
                tracing::debug!(step = %step, "contact form advanced");
            }
            Some(Ok(Advance::Submit(form))) => {
                self.state.reset_mode();
                self.renderer.set_prompt(None);
                contact::submit_form(self.renderer.surface_mut(), &self.submitter, form).await;
            }
            Some(Err(rejected)) => self.renderer.print_error(rejected.to_string()),
        }

        self.refresh_prompt();
    }

    /// Earliest pending timer, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|(deadline, _)| *deadline).min()
    }

    /// Fires every timer due at `now`.
    pub fn run_due(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.timers)
            .into_iter()
            .partition(|(deadline, _)| *deadline <= now);
        self.timers = pending;

        for (_, timer) in due {
            match timer {
                Timer::ShowOutput => self.renderer.set_visible(true),
            }
        }
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Reboot => {
                self.renderer.clear();
                self.boot().await;
            }
            Effect::Matrix => {
                self.renderer.set_visible(false);
                self.timers
                    .push((Instant::now() + MATRIX_DURATION, Timer::ShowOutput));
            }
        }
    }

    fn interrupt(&mut self) {
        if self.state.in_form() {
            self.cancel_form();
        } else if self.state.buffer.is_empty() {
            self.exit_requested = true;
        } else {
            let prompt = self.state.prompt(&self.identity);
            let buffer = self.state.buffer.take();
            self.renderer
                .print_line(OutputLine::echo(prompt, buffer).with_span(Span::styled("^C", Style::Dim)));
            self.state.history.reset_cursor();
        }
    }

    fn cancel_form(&mut self) {
        self.state.reset_mode();
        self.state.buffer.clear();
        self.renderer.print_line(OutputLine::styled(CANCELLED, Style::Dim));
    }

    fn refresh_prompt(&mut self) {
        let prompt = self.input_enabled().then(|| {
            PromptLine::new(
                self.state.prompt(&self.identity),
                self.state.buffer.as_str(),
            )
        });
        self.renderer.set_prompt(prompt);
    }
}
