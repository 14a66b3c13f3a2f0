//! Process-backed terminal: raw mode on stdin, writes to stdout.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::thread::{self, JoinHandle};

use crate::core::output::{OutputGate, TerminalCmd};
use crate::core::terminal::Terminal;

#[cfg(unix)]
use libc::{self, c_int};
#[cfg(unix)]
use signal_hook::iterator::Signals;

type InputHandler = Arc<Mutex<Option<Box<dyn FnMut(String) + Send>>>>;

const INPUT_POLL_MS: i32 = 50;

#[cfg(unix)]
fn write_fd(fd: c_int, data: &str) -> std::io::Result<()> {
    let bytes = data.as_bytes();
    let mut written = 0;
    while written < bytes.len() {
        let remaining = &bytes[written..];
        // SAFETY: `remaining` is a valid, initialized buffer for its length.
        let result =
            unsafe { libc::write(fd, remaining.as_ptr() as *const libc::c_void, remaining.len()) };
        if result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return Err(err);
        }
        if result == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                "write returned 0",
            ));
        }
        written += result as usize;
    }
    Ok(())
}

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    // SAFETY: TIOCGWINSZ fills the provided `winsize`.
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

#[cfg(unix)]
fn poll_readable(fd: c_int, timeout_ms: i32) -> bool {
    let mut fds = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    // SAFETY: one valid pollfd entry.
    let result = unsafe { libc::poll(&mut fds, 1, timeout_ms) };
    result > 0 && (fds.revents & libc::POLLIN) != 0
}

#[cfg(unix)]
fn get_termios(fd: c_int) -> std::io::Result<libc::termios> {
    // SAFETY: termios is plain data; tcgetattr initializes it on success.
    let mut termios = unsafe { std::mem::zeroed::<libc::termios>() };
    let result = unsafe { libc::tcgetattr(fd, &mut termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(termios)
}

#[cfg(unix)]
fn set_termios(fd: c_int, termios: &libc::termios) -> std::io::Result<()> {
    // SAFETY: `termios` points to a valid, initialized struct.
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) };
    if result != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(unix)]
pub struct ProcessTerminal {
    stdin_fd: c_int,
    stdout_fd: c_int,
    original_termios: Option<libc::termios>,
    input_handler: InputHandler,
    input_thread: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
    write_failed: bool,
}

#[cfg(unix)]
impl ProcessTerminal {
    pub fn new() -> Self {
        Self {
            stdin_fd: libc::STDIN_FILENO,
            stdout_fd: libc::STDOUT_FILENO,
            original_termios: None,
            input_handler: Arc::new(Mutex::new(None)),
            input_thread: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            write_failed: false,
        }
    }

    fn enable_raw_mode(&mut self) -> std::io::Result<()> {
        let original = match self.original_termios {
            Some(original) => original,
            None => {
                let original = get_termios(self.stdin_fd)?;
                self.original_termios = Some(original);
                original
            }
        };
        let mut raw = original;
        // SAFETY: `raw` is an initialized termios copy.
        unsafe {
            libc::cfmakeraw(&mut raw);
        }
        set_termios(self.stdin_fd, &raw)
    }

    fn restore_raw_mode(&mut self) -> std::io::Result<()> {
        if let Some(original) = self.original_termios.as_ref() {
            set_termios(self.stdin_fd, original)?;
        }
        Ok(())
    }

    fn start_input_thread(&mut self) {
        let stdin_fd = self.stdin_fd;
        let input_handler = Arc::clone(&self.input_handler);
        let stop_flag = Arc::clone(&self.stop_flag);

        self.input_thread = Some(thread::spawn(move || {
            let mut buffer = [0u8; 4096];
            let mut carry = Vec::new();

            while !stop_flag.load(Ordering::SeqCst) {
                if !poll_readable(stdin_fd, INPUT_POLL_MS) {
                    continue;
                }
                // SAFETY: `buffer` is valid for writes of its full length.
                let read_len =
                    unsafe { libc::read(stdin_fd, buffer.as_mut_ptr() as *mut _, buffer.len()) };
                if read_len <= 0 {
                    continue;
                }

                carry.extend_from_slice(&buffer[..read_len as usize]);
                let chunk = take_complete_utf8(&mut carry);
                if chunk.is_empty() {
                    continue;
                }

                let mut handler = lock_unpoisoned(&input_handler);
                if let Some(handler) = handler.as_mut() {
                    handler(chunk);
                }
            }
        }));
    }

    fn stop_input_thread(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.input_thread.take() {
            let _ = handle.join();
        }
    }

    fn write_commands(&mut self, cmds: impl IntoIterator<Item = TerminalCmd>) {
        let mut gate = OutputGate::new();
        for cmd in cmds {
            gate.push(cmd);
        }
        gate.flush(self);
    }
}

#[cfg(unix)]
impl Default for ProcessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl Terminal for ProcessTerminal {
    fn start(&mut self, on_input: Box<dyn FnMut(String) + Send>) -> std::io::Result<()> {
        *lock_unpoisoned(&self.input_handler) = Some(on_input);
        self.stop_flag.store(false, Ordering::SeqCst);

        if let Err(err) = self.enable_raw_mode() {
            *lock_unpoisoned(&self.input_handler) = None;
            return Err(err);
        }

        self.write_commands([TerminalCmd::KittyEnable]);
        self.start_input_thread();
        Ok(())
    }

    fn stop(&mut self) -> std::io::Result<()> {
        self.stop_input_thread();
        *lock_unpoisoned(&self.input_handler) = None;

        self.write_commands([
            TerminalCmd::KittyDisable,
            TerminalCmd::ShowCursor,
            TerminalCmd::BytesStatic("\r\n"),
        ]);

        // Flush input before leaving raw mode so buffered bytes don't leak to the shell.
        // SAFETY: plain fd operation.
        let _ = unsafe { libc::tcflush(self.stdin_fd, libc::TCIFLUSH) };

        self.restore_raw_mode()
    }

    fn write(&mut self, data: &str) {
        if self.write_failed || data.is_empty() {
            return;
        }
        if let Err(err) = write_fd(self.stdout_fd, data) {
            self.write_failed = true;
            tracing::warn!(error = %err, "terminal write failed; further output dropped");
        }
    }

    fn columns(&self) -> u16 {
        read_winsize(self.stdout_fd)
            .map(|(cols, _)| cols)
            .unwrap_or(80)
    }

    fn rows(&self) -> u16 {
        read_winsize(self.stdout_fd)
            .map(|(_, rows)| rows)
            .unwrap_or(24)
    }
}

#[cfg(unix)]
impl Drop for ProcessTerminal {
    fn drop(&mut self) {
        if self.input_thread.is_some() {
            let _ = self.stop();
        }
    }
}

/// Splits off the longest valid UTF-8 prefix; an incomplete trailing
/// character stays in `carry` for the next read.
fn take_complete_utf8(carry: &mut Vec<u8>) -> String {
    let valid_up_to = match std::str::from_utf8(carry) {
        Ok(_) => carry.len(),
        Err(err) if err.error_len().is_none() => err.valid_up_to(),
        Err(_) => {
            let text = String::from_utf8_lossy(carry).into_owned();
            carry.clear();
            return text;
        }
    };
    let rest = carry.split_off(valid_up_to);
    let complete = std::mem::replace(carry, rest);
    String::from_utf8(complete).unwrap_or_default()
}

/// Signal handler guard for cleanup hooks.
#[cfg(unix)]
pub struct SignalHookGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

#[cfg(unix)]
impl Drop for SignalHookGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Runs `on_signal` once for the first SIGTERM/SIGHUP received.
#[cfg(unix)]
pub fn install_signal_handlers<F>(on_signal: F) -> std::io::Result<SignalHookGuard>
where
    F: Fn() + Send + 'static,
{
    let mut signals = Signals::new([libc::SIGTERM, libc::SIGHUP])?;
    let handle = signals.handle();
    let fired = AtomicBool::new(false);

    let thread = thread::Builder::new()
        .name("ofo-signal-watch".to_string())
        .spawn(move || {
            for _ in signals.forever() {
                if !fired.swap(true, Ordering::SeqCst) {
                    on_signal();
                }
            }
        })?;

    Ok(SignalHookGuard {
        handle,
        thread: Some(thread),
    })
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
