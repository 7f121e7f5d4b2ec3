//! Main logger implementation

use super::{
    appender::Appender,
    call_stack,
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_record::{CallStack, LogRecord},
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    severity::Severity,
    timestamp::{parse_timezone, DateFacility, HostPlatform},
};
use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe, Location};

/// Leveled logger dispatching rendered records to its sinks
///
/// Everything that depends on the configuration (timezone, date facility,
/// output format, sink list) is resolved once at construction.
pub struct Logger {
    config: LoggerConfig,
    timezone: Tz,
    date: DateFacility,
    format: OutputFormat,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    diagnostics: Mutex<Box<dyn Write + Send>>,
    metrics: LoggerMetrics,
}

impl Logger {
    /// Build a logger from a resolved configuration
    ///
    /// Emits the initialization record before returning.
    #[track_caller]
    pub fn from_config(config: &LoggerConfig) -> Self {
        LoggerBuilder::new().config(config.clone()).build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn date_facility(&self) -> &DateFacility {
        &self.date
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Whether a record of `severity` passes the configured threshold
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity.is_enabled_for(self.config.level)
    }

    /// Log `message` at `severity`
    ///
    /// The call site's file becomes the record's `filename`.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        self.dispatch(severity, message.into(), Location::caller());
    }

    /// Log with a textual severity token (`D`, `info`, `WARNING`, ...)
    ///
    /// An unknown token is reported on stderr and the call is dropped.
    #[track_caller]
    pub fn log_token(&self, token: &str, message: impl Into<String>) {
        match token.parse::<Severity>() {
            Ok(severity) => self.dispatch(severity, message.into(), Location::caller()),
            Err(e) => {
                self.metrics.record_rejected();
                self.report(format_args!("[LOGGER ERROR] {}", e));
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    /// Render a record with this logger's output format
    pub fn render(&self, record: &LogRecord) -> String {
        self.format.format(record)
    }

    /// Flush every appender
    ///
    /// A failing or panicking appender does not stop the others; the first
    /// failure is returned once all of them have been flushed.
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        let mut first_error = None;

        for appender in appenders.iter_mut() {
            if let Err(e) = isolated(appender.as_mut(), |appender| appender.flush()) {
                self.metrics.record_sink_failure();
                self.report_sink_error(appender.name(), "flush", &e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn dispatch(&self, severity: Severity, message: String, location: &Location<'_>) {
        if !self.is_enabled(severity) {
            self.metrics.record_filtered();
            return;
        }

        let timestamp = self.date.now(&self.timezone);
        let call_stack = if self.config.call_stack {
            CallStack::from_collected(call_stack::collect())
        } else {
            CallStack::Disabled
        };

        let record = LogRecord::new(severity, message)
            .with_timestamp(timestamp)
            .with_call_stack(call_stack)
            .with_location(
                call_stack::basename(location.file()),
                call_stack::current_function(),
            );

        self.write(&self.render(&record));
    }

    /// Record announcing the resolved configuration
    ///
    /// Written as if issued at top level, whatever frames are active.
    fn announce(&self, location: &Location<'_>) {
        if !self.is_enabled(Severity::Info) {
            self.metrics.record_filtered();
            return;
        }

        let call_stack = if self.config.call_stack {
            CallStack::Root
        } else {
            CallStack::Disabled
        };
        let record = LogRecord::new(
            Severity::Info,
            format!("Logger initialized: {}", self.config.summary()),
        )
        .with_timestamp(self.date.now(&self.timezone))
        .with_call_stack(call_stack)
        .with_location(call_stack::basename(location.file()), None);

        self.write(&self.render(&record));
    }

    /// Fan a rendered line out to every appender
    ///
    /// **Per-Appender Isolation**: an appender that errors or panics is
    /// reported and the remaining appenders still run.
    fn write(&self, line: &str) {
        let mut appenders = self.appenders.lock();

        for appender in appenders.iter_mut() {
            if let Err(e) = isolated(appender.as_mut(), |appender| appender.append(line)) {
                self.metrics.record_sink_failure();
                self.report_sink_error(appender.name(), "append", &e);
            }
        }

        self.metrics.record_emitted();
    }

    fn report_sink_error(&self, name: &str, operation: &str, error: &LoggerError) {
        match error {
            LoggerError::AppenderPanicked { .. } => self.report(format_args!(
                "[LOGGER CRITICAL] {} during {}. Other appenders continue to function.",
                error, operation
            )),
            _ => self.report(format_args!(
                "[LOGGER ERROR] Appender '{}' failed to {}: {}",
                name, operation, error
            )),
        }
    }

    /// Write one diagnostic line; failures to report are ignored
    fn report(&self, message: fmt::Arguments<'_>) {
        let mut diagnostics = self.diagnostics.lock();
        let _ = writeln!(diagnostics, "{}", message);
    }
}

/// Run `operation` on `appender`, turning a panic into an error
fn isolated<F>(appender: &mut dyn Appender, operation: F) -> Result<()>
where
    F: FnOnce(&mut dyn Appender) -> Result<()>,
{
    let name = appender.name().to_string();
    match panic::catch_unwind(AssertUnwindSafe(|| operation(&mut *appender))) {
        Ok(result) => result,
        Err(payload) => Err(LoggerError::appender_panicked(name, panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .config(
///         LoggerConfig::new()
///             .with_stdout(false)
///             .with_log_files(Vec::<&str>::new()),
///     )
///     .min_level(Severity::Warning)
///     .build();
///
/// assert!(!logger.is_enabled(Severity::Info));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    host: Option<HostPlatform>,
    appenders: Vec<Box<dyn Appender>>,
    diagnostics: Option<Box<dyn Write + Send>>,
}

impl LoggerBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            host: None,
            appenders: Vec::new(),
            diagnostics: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the severity threshold
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Severity) -> Self {
        self.config.level = level;
        self
    }

    /// Resolve the date facility for `host` instead of the detected platform
    #[must_use = "builder methods return a new value"]
    pub fn host_platform(mut self, host: HostPlatform) -> Self {
        self.host = Some(host);
        self
    }

    /// Add an appender after the configured console and file sinks
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Send the logger's own diagnostics to `writer` instead of stderr
    #[must_use = "builder methods return a new value"]
    pub fn diagnostics<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.diagnostics = Some(Box::new(writer));
        self
    }

    /// Build the logger and emit its initialization record
    #[track_caller]
    pub fn build(self) -> Logger {
        self.build_at(Location::caller())
    }

    pub(crate) fn build_at(self, location: &Location<'_>) -> Logger {
        let LoggerBuilder {
            config,
            host,
            appenders: extra,
            diagnostics,
        } = self;

        let timezone = parse_timezone(&config.timezone);
        let host = host.unwrap_or_else(HostPlatform::detect);
        let date = DateFacility::resolve_for(&config.timestamp_format, &host);

        // The console branch always exists; disabling stdout only retargets it.
        let mut appenders: Vec<Box<dyn Appender>> = Vec::with_capacity(config.log_files.len() + 1);
        appenders.push(Box::new(ConsoleAppender::with_target(
            ConsoleTarget::from_stdout_flag(config.stdout),
        )));
        for path in &config.log_files {
            appenders.push(Box::new(FileAppender::new(path)));
        }
        appenders.extend(extra);

        let logger = Logger {
            format: OutputFormat::from_json_flag(config.json),
            timezone,
            date,
            appenders: Mutex::new(appenders),
            diagnostics: Mutex::new(diagnostics.unwrap_or_else(|| Box::new(io::stderr()))),
            metrics: LoggerMetrics::new(),
            config,
        };
        logger.announce(location);
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Shared in-memory writer for diagnostics
    #[derive(Clone, Default)]
    struct Diagnostics(Arc<Mutex<Vec<u8>>>);

    impl Diagnostics {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for Diagnostics {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CaptureAppender {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl CaptureAppender {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }
    }

    impl Appender for CaptureAppender {
        fn append(&mut self, line: &str) -> Result<()> {
            self.lines.lock().push(line.to_string());
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    fn quiet_config() -> LoggerConfig {
        LoggerConfig::new()
            .with_stdout(false)
            .with_log_files(Vec::<&str>::new())
    }

    fn capture_logger(config: LoggerConfig) -> (Logger, CaptureAppender) {
        let capture = CaptureAppender::default();
        let logger = Logger::builder()
            .config(config)
            .host_platform(HostPlatform::Gnu)
            .appender(capture.clone())
            .build();
        (logger, capture)
    }

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).expect("valid JSON line")
    }

    #[test]
    fn test_initialization_record() {
        let (logger, capture) = capture_logger(quiet_config());
        let lines = capture.lines();
        assert_eq!(lines.len(), 1);

        let init = parse(&lines[0]);
        assert_eq!(init["severity"], "INFO");
        assert!(init["message"]
            .as_str()
            .unwrap()
            .starts_with("Logger initialized: timezone=UTC level=DEBUG"));
        assert_eq!(init["filename"], "logger.rs");
        assert_eq!(init["funcname"], "main");
        assert!(init["call_stack"].is_null());
        assert_eq!(logger.metrics().emitted(), 1);
    }

    #[test]
    fn test_default_json_record_at_top_level() {
        let (logger, capture) = capture_logger(quiet_config());
        logger.log_token("I", "Server started");

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        let record = parse(&lines[1]);
        assert_eq!(record.as_object().unwrap().len(), 6);
        assert_eq!(record["severity"], "INFO");
        assert_eq!(record["message"], "Server started");
        assert_eq!(record["filename"], "logger.rs");
        assert_eq!(record["funcname"], "main");
        assert!(record["call_stack"].is_null());
        assert!(record["timestamp"].as_str().unwrap().ends_with("+00:00"));
    }

    #[test]
    fn test_call_stack_inside_frames() {
        let (logger, capture) = capture_logger(quiet_config());

        fn serve(logger: &Logger) {
            let _frame = call_stack::enter("serve");
            handle(logger);
        }
        fn handle(logger: &Logger) {
            let _frame = call_stack::enter("handle");
            logger.warning("slow request");
        }
        serve(&logger);

        let record = parse(&capture.lines()[1]);
        assert_eq!(record["funcname"], "handle");
        let stack = record["call_stack"].as_str().unwrap();
        let frames: Vec<&str> = stack.split("->").collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].starts_with("logger.rs["));
        assert!(frames[0].ends_with("]>serve"));
        assert!(frames[1].ends_with("]>handle"));
    }

    #[test]
    fn test_call_stack_disabled() {
        let (logger, capture) = capture_logger(quiet_config().with_call_stack(false));

        let _frame = call_stack::enter("worker");
        logger.info("no stack");

        let record = parse(&capture.lines()[1]);
        assert!(record["call_stack"].is_null());
        assert_eq!(record["funcname"], "worker");
    }

    #[test]
    fn test_plain_output() {
        let (logger, capture) = capture_logger(quiet_config().with_json(false));
        logger.error("disk full");
        {
            let _frame = call_stack::enter("flush");
            logger.error("retrying");
        }

        let lines = capture.lines();
        let fields: Vec<&str> = lines[1].split("::").collect();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[1], "ERROR");
        assert_eq!(fields[2], "disk full");
        assert_eq!(fields[3], "root");

        let fields: Vec<&str> = lines[2].split("::").collect();
        assert!(fields[3].ends_with("]>flush"));
    }

    #[test]
    fn test_plain_output_without_call_stack() {
        let (logger, capture) =
            capture_logger(quiet_config().with_json(false).with_call_stack(false));
        logger.debug("quiet");

        let line = &capture.lines()[1];
        assert!(line.ends_with("::DEBUG::quiet::"));
        assert_eq!(line.split("::").count(), 4);
    }

    #[test]
    fn test_threshold_filtering() {
        let (logger, capture) = capture_logger(quiet_config().with_level(Severity::Error));
        // INFO initialization record is itself filtered
        assert!(capture.lines().is_empty());

        logger.log_token("W", "warn msg");
        logger.debug("debug msg");
        assert!(capture.lines().is_empty());

        logger.log_token("e", "error msg");
        logger.log_token("CRITICAL", "critical msg");
        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(parse(&lines[0])["severity"], "ERROR");
        assert_eq!(parse(&lines[1])["severity"], "CRITICAL");
        assert_eq!(logger.metrics().filtered(), 3);
    }

    #[test]
    fn test_unknown_token_is_dropped() {
        let capture = CaptureAppender::default();
        let diagnostics = Diagnostics::default();
        let logger = Logger::builder()
            .config(quiet_config())
            .host_platform(HostPlatform::Gnu)
            .appender(capture.clone())
            .diagnostics(diagnostics.clone())
            .build();
        logger.log_token("X", "test");

        assert_eq!(capture.lines().len(), 1);
        assert_eq!(logger.metrics().rejected(), 1);
        assert_eq!(
            diagnostics.lines(),
            vec!["[LOGGER ERROR] Unknown log severity: 'X'".to_string()]
        );
    }

    #[test]
    fn test_failing_appender_does_not_block_others() {
        struct FailingAppender;

        impl Appender for FailingAppender {
            fn append(&mut self, _line: &str) -> Result<()> {
                Err(LoggerError::file_lock("simulated.log"))
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "failing"
            }
        }

        struct PanickingAppender;

        impl Appender for PanickingAppender {
            fn append(&mut self, _line: &str) -> Result<()> {
                panic!("appender exploded");
            }

            fn flush(&mut self) -> Result<()> {
                Ok(())
            }

            fn name(&self) -> &str {
                "panicking"
            }
        }

        let capture = CaptureAppender::default();
        let logger = Logger::builder()
            .config(quiet_config())
            .host_platform(HostPlatform::Gnu)
            .appender(FailingAppender)
            .appender(PanickingAppender)
            .appender(capture.clone())
            .build();
        logger.info("still delivered");

        assert_eq!(capture.lines().len(), 2);
        assert_eq!(logger.metrics().sink_failures(), 4);
        assert_eq!(logger.metrics().emitted(), 2);
    }

    #[test]
    fn test_console_branch_retargeted_not_removed() {
        let logger = Logger::builder()
            .config(quiet_config())
            .host_platform(HostPlatform::Gnu)
            .build();
        let appenders = logger.appenders.lock();
        assert_eq!(appenders.len(), 1);
        assert_eq!(appenders[0].name(), "console (discard)");
    }

    #[test]
    fn test_timezone_applied() {
        let (logger, capture) =
            capture_logger(quiet_config().with_timezone("Asia/Kolkata"));
        logger.info("tz");

        let record = parse(&capture.lines()[1]);
        assert!(record["timestamp"].as_str().unwrap().ends_with("+05:30"));
    }

    #[test]
    fn test_message_escaping_keeps_single_line() {
        let (logger, capture) = capture_logger(quiet_config());
        logger.info("first\nsecond \\n \"quoted\" a/b");

        let line = &capture.lines()[1];
        assert!(!line.contains('\n'));
        assert_eq!(parse(line)["message"], "first\nsecond \\n \"quoted\" a/b");
    }

    #[test]
    fn test_flush() {
        let (logger, _capture) = capture_logger(quiet_config());
        logger.flush().unwrap();
    }

    #[test]
    fn test_flush_continues_past_failing_appenders() {
        #[derive(Clone, Default)]
        struct FlushCounter(Arc<Mutex<usize>>);

        impl Appender for FlushCounter {
            fn append(&mut self, _line: &str) -> Result<()> {
                Ok(())
            }

            fn flush(&mut self) -> Result<()> {
                *self.0.lock() += 1;
                Ok(())
            }

            fn name(&self) -> &str {
                "counter"
            }
        }

        struct BrokenFlush {
            panics: bool,
        }

        impl Appender for BrokenFlush {
            fn append(&mut self, _line: &str) -> Result<()> {
                Ok(())
            }

            fn flush(&mut self) -> Result<()> {
                if self.panics {
                    panic!("flush exploded");
                }
                Err(LoggerError::file_lock("broken.log"))
            }

            fn name(&self) -> &str {
                "broken"
            }
        }

        let counter = FlushCounter::default();
        let diagnostics = Diagnostics::default();
        let logger = Logger::builder()
            .config(quiet_config())
            .host_platform(HostPlatform::Gnu)
            .appender(BrokenFlush { panics: true })
            .appender(BrokenFlush { panics: false })
            .appender(counter.clone())
            .diagnostics(diagnostics.clone())
            .build();

        let err = logger.flush().unwrap_err();
        assert!(matches!(err, LoggerError::AppenderPanicked { .. }));
        assert_eq!(*counter.0.lock(), 1);
        assert_eq!(logger.metrics().sink_failures(), 2);

        let reported = diagnostics.lines();
        assert_eq!(reported.len(), 2);
        assert!(reported[0].starts_with("[LOGGER CRITICAL] Appender 'broken' panicked: flush exploded"));
        assert_eq!(
            reported[1],
            "[LOGGER ERROR] Appender 'broken' failed to flush: \
             Failed to acquire file lock on 'broken.log'"
        );
    }
}
