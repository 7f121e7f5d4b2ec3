//! Output formats for log records
//!
//! - Plain: `::`-delimited fields, message written verbatim
//! - Json: one JSON object per line with a fixed key order

use super::log_record::{CallStack, LogRecord};

/// Field delimiter of the plain format
pub const PLAIN_DELIMITER: &str = "::";

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `timestamp::SEVERITY::message::call_stack`
    ///
    /// Example: `2025-01-08T10:30:45.123+00:00::INFO::Server started::root`
    Plain,

    /// Single-line JSON object
    ///
    /// Example: `{"timestamp":"…","severity":"INFO","message":"Server started","filename":"main.rs","funcname":"main","call_stack":null}`
    #[default]
    Json,
}

impl OutputFormat {
    /// Select the format from the `json` configuration flag
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }

    /// Render a record, without the trailing newline
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            OutputFormat::Plain => format_plain(record),
            OutputFormat::Json => format_json(record),
        }
    }
}

fn format_plain(record: &LogRecord) -> String {
    let call_stack = match &record.call_stack {
        CallStack::Disabled => "",
        CallStack::Root => "root",
        CallStack::Path(path) => path.as_str(),
    };

    [
        record.timestamp.as_str(),
        record.severity.label(),
        record.message.as_str(),
        call_stack,
    ]
    .join(PLAIN_DELIMITER)
}

fn format_json(record: &LogRecord) -> String {
    let call_stack = match &record.call_stack {
        CallStack::Path(path) => format!("\"{}\"", escape_json(path)),
        CallStack::Disabled | CallStack::Root => "null".to_string(),
    };

    format!(
        "{{\"timestamp\":\"{}\",\"severity\":\"{}\",\"message\":\"{}\",\"filename\":\"{}\",\"funcname\":\"{}\",\"call_stack\":{}}}",
        escape_json(&record.timestamp),
        record.severity.label(),
        escape_json(&record.message),
        escape_json(&record.filename),
        escape_json(&record.funcname),
        call_stack
    )
}

/// Escape a string for embedding inside a JSON string literal
///
/// Backslash goes first so later escapes are not doubled. Only
/// backslash, `/`, `"`, backspace, form feed, newline, carriage return and
/// tab are rewritten. Any other control character (U+0000 to U+001F, for
/// example `\u{07}`) is copied through unchanged, and a JSON line holding
/// one will not parse as strict JSON.
pub fn escape_json(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('/', "\\/")
        .replace('"', "\\\"")
        .replace('\u{08}', "\\b")
        .replace('\u{0C}', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
