//! # Leveled Logger
//!
//! A small leveled logging facility for command-line tools.
//!
//! ## Features
//!
//! - **Severities**: `CRITICAL`, `ERROR`, `WARNING`, `INFO`, `DEBUG` with a threshold filter
//! - **Two formats**: `::`-delimited plaintext or single-line JSON
//! - **Call stacks**: explicit frames rendered as `file[line]>function->...`
//! - **Sinks**: console (or a discard target) plus any number of append-mode files
//! - **Configuration**: `LOGGING_*` environment overrides over a JSON config file
//!
//! ## Example
//!
//! ```no_run
//! use leveled_logger::{info, scope};
//!
//! fn start_server() {
//!     let _frame = scope!();
//!     info!(leveled_logger::global(), "Server listening on port {}", 8080);
//! }
//!
//! leveled_logger::log("I", "Server starting");
//! start_server();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

use std::panic::Location;
use std::sync::OnceLock;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender};
    pub use crate::core::{
        Appender, CallStack, ConfigLoader, DateFacility, Dialect, HostPlatform, LogRecord,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Result,
        Severity,
    };
}

pub use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender};
pub use crate::core::{
    call_stack, escape_json, Appender, CallStack, ConfigLoader, DateFacility, Dialect,
    FileConfig, Frame, FrameGuard, HostPlatform, LogRecord, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, OutputFormat, Result, Severity, DEFAULT_TIMESTAMP_FORMAT,
    TOP_LEVEL_FUNCTION,
};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a logger is already
/// installed, including one created lazily by [`global`].
#[track_caller]
pub fn init(config: &LoggerConfig) -> Result<&'static Logger> {
    let location = Location::caller();
    let mut installed = false;
    let logger = GLOBAL.get_or_init(|| {
        installed = true;
        LoggerBuilder::new().config(config.clone()).build_at(location)
    });
    if installed {
        Ok(logger)
    } else {
        Err(LoggerError::AlreadyInitialized)
    }
}

/// The process-wide logger, resolved from the environment on first use
#[track_caller]
pub fn global() -> &'static Logger {
    let location = Location::caller();
    GLOBAL.get_or_init(|| {
        LoggerBuilder::new()
            .config(LoggerConfig::load())
            .build_at(location)
    })
}

/// Log through the process-wide logger
///
/// `severity` is one of `D|DEBUG|I|INFO|W|WARNING|E|ERROR|C|CRITICAL`
/// (case-insensitive). Unknown tokens are reported on stderr and dropped.
#[track_caller]
pub fn log(severity: &str, message: impl Into<String>) {
    global().log_token(severity, message);
}
