//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::info;
//!
//! let logger = Logger::builder()
//!     .config(LoggerConfig::new().with_stdout(false).with_log_files(Vec::<&str>::new()))
//!     .build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().config(LoggerConfig::new().with_stdout(false).with_log_files(Vec::<&str>::new())).build();
/// use leveled_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().config(LoggerConfig::new().with_stdout(false).with_log_files(Vec::<&str>::new())).build();
/// use leveled_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().config(LoggerConfig::new().with_stdout(false).with_log_files(Vec::<&str>::new())).build();
/// use leveled_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Critical, $($arg)+)
    };
}

/// Enter a call-stack frame for the rest of the enclosing scope.
///
/// Without arguments the frame is named after the enclosing function.
///
/// # Examples
///
/// ```
/// use leveled_logger::{call_stack, scope};
///
/// fn load_settings() {
///     let _frame = scope!();
///     assert_eq!(call_stack::current_function().as_deref(), Some("load_settings"));
/// }
///
/// load_settings();
///
/// let _frame = scope!("startup");
/// assert_eq!(call_stack::depth(), 1);
/// ```
#[macro_export]
macro_rules! scope {
    () => {{
        fn __frame_marker() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::call_stack::enter($crate::core::call_stack::function_name_from_type(
            __type_name_of(__frame_marker),
        ))
    }};
    ($name:expr) => {
        $crate::core::call_stack::enter($name)
    };
}
