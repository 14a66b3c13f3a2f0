use std::time::Duration;

use ofo_shell::{parse_keys, AnsiSurface, ContactSubmitter, DisplaySurface, Shell, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};

/// Cursor blink while output is visible.
pub const BLINK_PERIOD: Duration = Duration::from_millis(530);
/// Rain frame rate while output is hidden.
pub const RAIN_PERIOD: Duration = Duration::from_millis(80);

/// What the stdin and signal threads hand to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Input(String),
    Signal,
}

fn tick_period<T: Terminal>(surface: &AnsiSurface<T>) -> Duration {
    if surface.is_visible() {
        BLINK_PERIOD
    } else {
        RAIN_PERIOD
    }
}

/// Feeds one stdin chunk key by key. Keys after an exit request or a reboot are discarded.
async fn feed<T, C>(shell: &mut Shell<AnsiSurface<T>, C>, chunk: &str)
where
    T: Terminal,
    C: ContactSubmitter,
{
    let boots = shell.boot_count();
    for key in parse_keys(chunk) {
        shell.handle_key(key).await;
        if shell.exit_requested() || shell.boot_count() != boots {
            break;
        }
    }
}

/// Runs until the shell asks to exit, a signal arrives, or every sender is gone.
pub async fn event_loop<T, C>(
    shell: &mut Shell<AnsiSurface<T>, C>,
    events: &mut UnboundedReceiver<HostEvent>,
) where
    T: Terminal,
    C: ContactSubmitter,
{
    let mut next_tick = Instant::now() + tick_period(shell.surface());

    while !shell.exit_requested() {
        let deadline = shell.next_deadline();
        tokio::select! {
            event = events.recv() => match event {
                Some(HostEvent::Input(chunk)) => feed(shell, &chunk).await,
                Some(HostEvent::Signal) => {
                    tracing::info!("termination signal received");
                    break;
                }
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or(next_tick)), if deadline.is_some() => {
                shell.run_due(Instant::now());
            }
            _ = sleep_until(next_tick) => {
                shell.surface_mut().tick();
                next_tick = Instant::now() + tick_period(shell.surface());
            }
        }
        next_tick = next_tick.min(Instant::now() + tick_period(shell.surface()));
    }
}

#[cfg(unix)]
pub async fn run(config: ofo_shell::EnvConfig) -> std::io::Result<()> {
    use std::io;

    use ofo_shell::{content, sound, Identity, ProcessTerminal};
    use tokio::sync::mpsc;

    use crate::submitter::RelaySubmitter;

    let vfs = content::portfolio().map_err(io::Error::other)?;
    let submitter = RelaySubmitter::from_config(&config).map_err(io::Error::other)?;
    let identity = Identity::new(config.user.clone(), config.host.clone());
    let mut shell = Shell::new(
        AnsiSurface::new(ProcessTerminal::new()),
        submitter,
        vfs,
        identity,
    )
    .with_sound(sound::from_config(config.sound));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let gate = shell.input_gate();
    let input_tx = tx.clone();
    shell
        .surface_mut()
        .terminal_mut()
        .start(Box::new(move |chunk| {
            if gate.is_open() {
                let _ = input_tx.send(HostEvent::Input(chunk));
            }
        }))?;
    let _signals = ofo_shell::install_signal_handlers(move || {
        let _ = tx.send(HostEvent::Signal);
    })?;

    tracing::info!(
        user = %config.user,
        host = %config.host,
        endpoint = %config.contact_endpoint,
        "session started"
    );
    if config.skip_boot {
        shell.skip_boot();
    } else {
        shell.boot().await;
    }

    event_loop(&mut shell, &mut rx).await;
    tracing::info!("session ended");
    shell.surface_mut().terminal_mut().stop()
}

#[cfg(test)]
mod tests {
    use ofo_shell::core::terminal::RecordingTerminal;
    use ofo_shell::{content, ContactForm, Identity, SubmissionError, MATRIX_DURATION};
    use tokio::sync::mpsc;

    use super::*;

    struct Accepting;

    impl ContactSubmitter for Accepting {
        async fn submit(&self, _form: &ContactForm) -> Result<(), SubmissionError> {
            Ok(())
        }
    }

    fn shell() -> Shell<AnsiSurface<RecordingTerminal>, Accepting> {
        let mut shell = Shell::new(
            AnsiSurface::new(RecordingTerminal::new(40, 10)),
            Accepting,
            content::portfolio().expect("portfolio builds"),
            Identity::new("operator", "owenofarrell"),
        );
        shell.skip_boot();
        shell
    }

    #[tokio::test(start_paused = true)]
    async fn typed_chunks_run_commands_until_interrupt() {
        let mut shell = shell();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(HostEvent::Input("whoami\r".to_string())).unwrap();
        tx.send(HostEvent::Input("\x03".to_string())).unwrap();

        event_loop(&mut shell, &mut rx).await;

        assert!(shell.exit_requested());
        let written = shell.surface_mut().terminal_mut().take_written();
        assert!(written.contains("You are the operator. I am the machine."));
    }

    #[tokio::test(start_paused = true)]
    async fn signal_stops_the_loop_without_an_exit_request() {
        let mut shell = shell();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(HostEvent::Signal).unwrap();

        event_loop(&mut shell, &mut rx).await;

        assert!(!shell.exit_requested());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_stops_the_loop() {
        let mut shell = shell();
        let (tx, mut rx) = mpsc::unbounded_channel::<HostEvent>();
        drop(tx);

        event_loop(&mut shell, &mut rx).await;

        assert!(!shell.exit_requested());
    }

    #[tokio::test(start_paused = true)]
    async fn matrix_rain_runs_until_its_timer_restores_output() {
        let mut shell = shell();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let feeder = async move {
            tx.send(HostEvent::Input("matrix\r".to_string())).unwrap();
            tokio::time::sleep(MATRIX_DURATION + Duration::from_millis(10)).await;
            tx.send(HostEvent::Input("\x03".to_string())).unwrap();
        };

        tokio::join!(event_loop(&mut shell, &mut rx), feeder);

        assert!(shell.surface().is_visible());
        assert!(shell.exit_requested());
        let written = shell.surface_mut().terminal_mut().take_written();
        assert!(written.matches("\x1b[H").count() > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn keys_after_a_reboot_in_the_same_chunk_are_dropped() {
        let mut shell = shell();
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(HostEvent::Input("reboot\rwhoami\r".to_string())).unwrap();
        tx.send(HostEvent::Signal).unwrap();

        event_loop(&mut shell, &mut rx).await;

        assert_eq!(shell.boot_count(), 2);
        assert!(shell.state().history.entries().iter().all(|entry| entry != "whoami"));
    }
}
