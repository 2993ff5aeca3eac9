//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Commands never call `println!` directly. They write through an
//! [`Output`] handed to them by the dispatcher, which respects the quiet
//! flag and can be pointed at an in-memory buffer in tests.

use std::cell::RefCell;
use std::fmt::Display;
use std::io::{self, Write};
use std::rc::Rc;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors and requested data only
    Quiet,
    /// Normal mode - standard output
    Normal,
}

/// Output sink shared by every command.
pub struct Output {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    verbosity: Verbosity,
}

impl Output {
    /// Create an output writing to the given streams.
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>, verbosity: Verbosity) -> Self {
        Self {
            out,
            err,
            verbosity,
        }
    }

    /// Output bound to the process stdout and stderr.
    pub fn stdio() -> Self {
        Self::new(
            Box::new(io::stdout()),
            Box::new(io::stderr()),
            Verbosity::Normal,
        )
    }

    /// Output captured in memory.
    ///
    /// Both streams are recorded into the returned buffer, in write order.
    pub fn buffer() -> (Self, OutputBuffer) {
        let buffer = OutputBuffer::default();
        let output = Self::new(
            Box::new(buffer.clone()),
            Box::new(buffer.clone()),
            Verbosity::Normal,
        );
        (output, buffer)
    }

    /// Current verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Change verbosity (after global flags are parsed).
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Check for quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Raw access to the standard stream.
    pub fn stdout(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// Raw access to the diagnostic stream.
    pub fn stderr(&mut self) -> &mut dyn Write {
        self.err.as_mut()
    }

    /// Print a message (respects quiet mode).
    pub fn print(&mut self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            let _ = writeln!(self.out, "{}", message);
        }
    }

    /// Print data the user asked for (shown even in quiet mode).
    pub fn data(&mut self, message: impl Display) {
        let _ = writeln!(self.out, "{}", message);
    }

    /// Print an error message (always shown).
    pub fn error(&mut self, message: impl Display) {
        let _ = writeln!(self.err, "error: {}", message);
    }

    /// Print a warning message (respects quiet mode).
    pub fn warn(&mut self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            let _ = writeln!(self.err, "warning: {}", message);
        }
    }

    /// Print a success message (respects quiet mode).
    pub fn success(&mut self, message: impl Display) {
        if self.verbosity != Verbosity::Quiet {
            let _ = writeln!(self.out, "{}", message);
        }
    }

    /// Flush both streams.
    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }
}

/// In-memory capture of an [`Output`].
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
