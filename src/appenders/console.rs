//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::{self, Write};

/// Where the console branch of the fan-out ends up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    /// Lines are accepted and thrown away
    Discard,
}

impl ConsoleTarget {
    /// Pick the target from the `stdout` configuration flag
    pub fn from_stdout_flag(stdout: bool) -> Self {
        if stdout {
            ConsoleTarget::Stdout
        } else {
            ConsoleTarget::Discard
        }
    }
}

pub struct ConsoleAppender {
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
        }
    }

    /// Create a console appender for an explicit target
    ///
    /// # Example
    ///
    /// ```
    /// use leveled_logger::appenders::{ConsoleAppender, ConsoleTarget};
    ///
    /// let quiet = ConsoleAppender::with_target(ConsoleTarget::Discard);
    /// assert_eq!(quiet.target(), ConsoleTarget::Discard);
    /// ```
    pub fn with_target(target: ConsoleTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(line.as_bytes())?;
                stdout.write_all(b"\n")?;
            }
            ConsoleTarget::Discard => {
                let mut sink = io::sink();
                sink.write_all(line.as_bytes())?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.target == ConsoleTarget::Stdout {
            io::stdout().flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "console",
            ConsoleTarget::Discard => "console (discard)",
        }
    }
}
