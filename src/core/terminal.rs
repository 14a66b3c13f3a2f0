//! Terminal trait and a recording implementation for tests.

/// Minimal terminal interface the emulator renders through.
pub trait Terminal {
    /// Start the terminal; raw input chunks are delivered to `on_input`.
    fn start(&mut self, on_input: Box<dyn FnMut(String) + Send>) -> std::io::Result<()>;

    /// Stop the terminal and restore state.
    fn stop(&mut self) -> std::io::Result<()>;

    /// Write output to the terminal.
    fn write(&mut self, data: &str);

    /// Terminal dimensions.
    fn columns(&self) -> u16;
    fn rows(&self) -> u16;
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn start(&mut self, on_input: Box<dyn FnMut(String) + Send>) -> std::io::Result<()> {
        (**self).start(on_input)
    }

    fn stop(&mut self) -> std::io::Result<()> {
        (**self).stop()
    }

    fn write(&mut self, data: &str) {
        (**self).write(data)
    }

    fn columns(&self) -> u16 {
        (**self).columns()
    }

    fn rows(&self) -> u16 {
        (**self).rows()
    }
}

/// Records writes instead of touching a tty.
#[derive(Debug, Default)]
pub struct RecordingTerminal {
    pub written: String,
    pub started: bool,
    pub columns: u16,
    pub rows: u16,
}

impl RecordingTerminal {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Returns and forgets everything written so far.
    pub fn take_written(&mut self) -> String {
        std::mem::take(&mut self.written)
    }
}

impl Terminal for RecordingTerminal {
    fn start(&mut self, _on_input: Box<dyn FnMut(String) + Send>) -> std::io::Result<()> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> std::io::Result<()> {
        self.started = false;
        Ok(())
    }

    fn write(&mut self, data: &str) {
        self.written.push_str(data);
    }

    fn columns(&self) -> u16 {
        self.columns
    }

    fn rows(&self) -> u16 {
        self.rows
    }
}
