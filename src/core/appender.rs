//! Appender trait for log output destinations

use super::error::Result;

/// A sink receiving rendered log lines
///
/// `line` never carries the trailing newline; each appender terminates it.
pub trait Appender: Send + Sync {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
