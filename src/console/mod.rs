//! Operator console
//!
//! Reads commands from a line-oriented input and drives a [`Transport`];
//! prints connection events as they arrive. Both sides write through one
//! shared [`Output`] so lines from the worker thread and the input thread
//! never interleave.

mod command;
mod input;
mod printer;

use std::io::Write;
use std::sync::{Arc, Mutex};

pub use command::{Command, strip_line_ending};
pub use input::{LoopExit, Transport, run_input_loop};
pub use printer::{ConsolePrinter, render_event};

pub const PROMPT: &str = "> ";

/// Cloneable, thread-safe handle to the console's output stream.
#[derive(Clone)]
pub struct Output {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Write one full line.
    pub fn line(&self, text: impl AsRef<str>) {
        self.write(|w| writeln!(w, "{}", text.as_ref()));
    }

    /// Write the prompt without a newline.
    pub fn prompt(&self) {
        self.write(|w| write!(w, "{}", PROMPT));
    }

    fn write(&self, f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let writer: &mut dyn Write = &mut **guard;
        if let Err(e) = f(writer).and_then(|_| writer.flush()) {
            log::warn!("Failed to write to console: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::Output;

    /// In-memory writer whose contents can be read back after the fact.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn output() -> (Output, SharedBuffer) {
            let buffer = SharedBuffer::default();
            (Output::new(buffer.clone()), buffer)
        }

        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        pub fn lines(&self) -> Vec<String> {
            self.contents()
                .replace(super::PROMPT, "")
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
