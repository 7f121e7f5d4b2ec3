//! Core logger types and traits

pub mod appender;
pub mod call_stack;
pub mod config;
pub mod error;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod severity;
pub mod timestamp;

pub use appender::Appender;
pub use call_stack::{Frame, FrameGuard};
pub use config::{ConfigLoader, FileConfig, LoggerConfig};
pub use error::{LoggerError, Result};
pub use log_record::{CallStack, LogRecord, TOP_LEVEL_FUNCTION};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::{escape_json, OutputFormat};
pub use severity::Severity;
pub use timestamp::{DateFacility, Dialect, HostPlatform, DEFAULT_TIMESTAMP_FORMAT};
