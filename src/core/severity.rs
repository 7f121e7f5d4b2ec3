//! Severity definitions
//!
//! Ranks follow syslog numbering: a lower rank is more severe.

use super::error::LoggerError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Critical = 2,
    Error = 3,
    Warning = 4,
    Info = 6,
    #[default]
    Debug = 7,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Single-letter token accepted by the parser
    pub fn short_code(&self) -> char {
        match self {
            Severity::Critical => 'C',
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Info => 'I',
            Severity::Debug => 'D',
        }
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Whether a record of this severity passes a `threshold` filter
    #[inline]
    pub fn is_enabled_for(&self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "C" | "CRITICAL" => Ok(Severity::Critical),
            "E" | "ERROR" => Ok(Severity::Error),
            "W" | "WARNING" => Ok(Severity::Warning),
            "I" | "INFO" => Ok(Severity::Info),
            "D" | "DEBUG" => Ok(Severity::Debug),
            _ => Err(LoggerError::unknown_severity(s)),
        }
    }
}
