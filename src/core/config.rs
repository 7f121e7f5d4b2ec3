//! Logger configuration
//!
//! Every setting resolves with the same precedence: environment override,
//! then the JSON config file, then the built-in default. The list of log
//! files is resolved as a whole and never merged element by element.
//!
//! | Setting | Environment | Config key | Default |
//! |---|---|---|---|
//! | timezone | `LOGGING_TIMEZONE` | `timezone` | `UTC` |
//! | threshold | `LOGGING_LEVEL` | `level` | `DEBUG` |
//! | console output | `LOGGING_STDOUT` | `stdout` | `true` |
//! | call stacks | `LOGGING_CALL_STACK` | `call_stack` | `true` |
//! | timestamp template | `LOGGING_TIMESTAMP_FORMAT` | `timestamp_format` | `%Y-%m-%dT%H:%M:%S.%3N%:z` |
//! | JSON output | `LOGGING_JSON` | `json` | `true` |
//! | log files | `LOGGING_FILES` (comma-separated) | `log_files` | `["logging.log"]` |
//!
//! The config file path comes from `LOGGING_CONFIG` and defaults to
//! `logging.json`; a missing file is not an error.

use super::error::{LoggerError, Result};
use super::severity::Severity;
use super::timestamp::{DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TIMEZONE};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILE: &str = "logging.log";
pub const DEFAULT_CONFIG_FILE: &str = "logging.json";

pub const ENV_PREFIX: &str = "LOGGING_";
pub const ENV_CONFIG: &str = "LOGGING_CONFIG";
pub const ENV_TIMEZONE: &str = "LOGGING_TIMEZONE";
pub const ENV_LEVEL: &str = "LOGGING_LEVEL";
pub const ENV_STDOUT: &str = "LOGGING_STDOUT";
pub const ENV_CALL_STACK: &str = "LOGGING_CALL_STACK";
pub const ENV_TIMESTAMP_FORMAT: &str = "LOGGING_TIMESTAMP_FORMAT";
pub const ENV_JSON: &str = "LOGGING_JSON";
pub const ENV_FILES: &str = "LOGGING_FILES";

/// Resolved, immutable logger configuration
///
/// # Examples
///
/// ```
/// use leveled_logger::{LoggerConfig, Severity};
///
/// let config = LoggerConfig::new()
///     .with_level(Severity::Info)
///     .with_json(false)
///     .with_log_files(Vec::<&str>::new());
///
/// assert_eq!(config.level, Severity::Info);
/// assert!(config.log_files.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// IANA timezone name used to render timestamps
    pub timezone: String,
    /// Least severe level that is still emitted
    pub level: Severity,
    pub stdout: bool,
    pub call_stack: bool,
    /// GNU `date` style template
    pub timestamp_format: String,
    pub json: bool,
    /// Append-mode file sinks, written in order
    pub log_files: Vec<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            level: Severity::Debug,
            stdout: true,
            call_stack: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            json: true,
            log_files: vec![PathBuf::from(DEFAULT_LOG_FILE)],
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve from the process environment and the config file it points to
    pub fn load() -> Self {
        ConfigLoader::from_env().load()
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_stdout(mut self, stdout: bool) -> Self {
        self.stdout = stdout;
        self
    }

    #[must_use]
    pub fn with_call_stack(mut self, call_stack: bool) -> Self {
        self.call_stack = call_stack;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[must_use]
    pub fn with_log_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.log_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// One-line description used by the initialization record
    pub fn summary(&self) -> String {
        let files = self
            .log_files
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "timezone={} level={} stdout={} call_stack={} json={} timestamp_format={} log_files=[{}]",
            self.timezone,
            self.level,
            self.stdout,
            self.call_stack,
            self.json,
            self.timestamp_format,
            files
        )
    }
}

/// Settings read from the JSON config file; every key is optional
///
/// Flags are kept as raw JSON so a badly typed flag is dropped on its own
/// instead of rejecting the whole file. They accept a JSON boolean or any
/// string [`parse_bool`] understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub timezone: Option<String>,
    pub level: Option<String>,
    pub stdout: Option<Value>,
    pub call_stack: Option<Value>,
    pub timestamp_format: Option<String>,
    pub json: Option<Value>,
    pub log_files: Option<Vec<String>>,
}

impl FileConfig {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Read and parse `path`; `Ok(None)` when the file does not exist
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading config file",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&contents).map(Some)
    }
}

/// Resolves a [`LoggerConfig`] from environment-style variables and a config file
///
/// # Example
///
/// ```
/// use leveled_logger::{ConfigLoader, Severity};
///
/// let config = ConfigLoader::from_vars([("LOGGING_LEVEL", "W"), ("LOGGING_JSON", "false")])
///     .resolve(None);
///
/// assert_eq!(config.level, Severity::Warning);
/// assert!(!config.json);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    vars: HashMap<String, String>,
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Capture the `LOGGING_*` variables of the current process
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)))
    }

    /// Use an explicit set of variables instead of the process environment
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            config_path: None,
        }
    }

    /// Read the config file from `path`, ignoring `LOGGING_CONFIG`
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .or_else(|| self.var(ENV_CONFIG).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Read the config file (if any) and resolve every setting
    ///
    /// A malformed file is reported on stderr and treated as absent.
    pub fn load(&self) -> LoggerConfig {
        let path = self.config_path();
        let file = match FileConfig::read(&path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!(
                    "[LOGGER WARNING] Ignoring malformed config file '{}': {}",
                    path.display(),
                    e
                );
                None
            }
        };
        self.resolve(file.as_ref())
    }

    /// Merge the variables with already-parsed file settings
    pub fn resolve(&self, file: Option<&FileConfig>) -> LoggerConfig {
        let defaults = LoggerConfig::default();
        let file = file.cloned().unwrap_or_default();

        let timezone = self
            .var(ENV_TIMEZONE)
            .map(str::to_string)
            .or(file.timezone)
            .unwrap_or(defaults.timezone);

        let level = self
            .parsed(ENV_LEVEL, |raw| raw.parse::<Severity>())
            .or_else(|| {
                file.level
                    .as_deref()
                    .and_then(|raw| report_ignored("config file key 'level'", raw.parse()))
            })
            .unwrap_or(defaults.level);

        let stdout = self
            .parsed(ENV_STDOUT, |raw| parse_bool(ENV_STDOUT, raw))
            .or_else(|| file_flag("stdout", file.stdout.as_ref()))
            .unwrap_or(defaults.stdout);

        let call_stack = self
            .parsed(ENV_CALL_STACK, |raw| parse_bool(ENV_CALL_STACK, raw))
            .or_else(|| file_flag("call_stack", file.call_stack.as_ref()))
            .unwrap_or(defaults.call_stack);

        let timestamp_format = self
            .var(ENV_TIMESTAMP_FORMAT)
            .map(str::to_string)
            .or(file.timestamp_format)
            .unwrap_or(defaults.timestamp_format);

        let json = self
            .parsed(ENV_JSON, |raw| parse_bool(ENV_JSON, raw))
            .or_else(|| file_flag("json", file.json.as_ref()))
            .unwrap_or(defaults.json);

        let log_files = self
            .var(ENV_FILES)
            .map(split_file_list)
            .filter(|files| !files.is_empty())
            .or_else(|| {
                file.log_files
                    .map(|files| files.into_iter().map(PathBuf::from).collect())
            })
            .unwrap_or(defaults.log_files);

        LoggerConfig {
            timezone,
            level,
            stdout,
            call_stack,
            timestamp_format,
            json,
            log_files,
        }
    }

    /// A variable's value; unset and empty are treated alike
    fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn parsed<T>(&self, key: &str, parse: impl FnOnce(&str) -> Result<T>) -> Option<T> {
        let raw = self.var(key)?;
        report_ignored(key, parse(raw))
    }
}

fn report_ignored<T>(source: &str, parsed: Result<T>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            eprintln!("[LOGGER WARNING] Ignoring {}: {}", source, e);
            None
        }
    }
}

/// Parse a boolean setting (`true/false`, `1/0`, `yes/no`, `on/off`)
pub fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LoggerError::config(
            key,
            format!("expected a boolean, got '{}'", raw),
        )),
    }
}

/// Resolve a config-file flag, reporting and dropping unusable values
fn file_flag(key: &str, value: Option<&Value>) -> Option<bool> {
    let source = format!("config file key '{}'", key);
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::String(raw) => report_ignored(&source, parse_bool(key, raw)),
        other => report_ignored(
            &source,
            Err(LoggerError::config(
                key,
                format!("expected a boolean, got {}", other),
            )),
        ),
    }
}

fn split_file_list(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}
