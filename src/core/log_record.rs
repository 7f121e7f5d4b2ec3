//! Log record structure

use super::severity::Severity;

/// Sentinel function name for records issued outside any entered frame
pub const TOP_LEVEL_FUNCTION: &str = "main";

/// Call-stack field of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallStack {
    /// Capture is turned off
    Disabled,
    /// Capture is on but the record was issued at top level
    Root,
    /// Rendered `file[line]>function->...` path
    Path(String),
}

impl CallStack {
    /// Wrap the result of a stack collection
    pub fn from_collected(collected: Option<String>) -> Self {
        match collected {
            Some(path) if !path.is_empty() => CallStack::Path(path),
            _ => CallStack::Root,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            CallStack::Path(path) => Some(path),
            _ => None,
        }
    }
}

/// A single record, built and rendered within one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: String,
    pub severity: Severity,
    pub message: String,
    pub call_stack: CallStack,
    /// Basename of the source file containing the log call
    pub filename: String,
    /// Innermost entered frame, or [`TOP_LEVEL_FUNCTION`]
    pub funcname: String,
}

impl LogRecord {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: String::new(),
            severity,
            message: message.into(),
            call_stack: CallStack::Disabled,
            filename: String::new(),
            funcname: TOP_LEVEL_FUNCTION.to_string(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_call_stack(mut self, call_stack: CallStack) -> Self {
        self.call_stack = call_stack;
        self
    }

    pub fn with_location(mut self, filename: &str, funcname: Option<String>) -> Self {
        self.filename = filename.to_string();
        self.funcname = funcname.unwrap_or_else(|| TOP_LEVEL_FUNCTION.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_collected() {
        assert_eq!(CallStack::from_collected(None), CallStack::Root);
        assert_eq!(CallStack::from_collected(Some(String::new())), CallStack::Root);
        assert_eq!(
            CallStack::from_collected(Some("a.rs[1]>f".to_string())),
            CallStack::Path("a.rs[1]>f".to_string())
        );
    }

    #[test]
    fn test_builder_defaults() {
        let record = LogRecord::new(Severity::Info, "hello")
            .with_timestamp("2025-01-08T10:30:45.123+00:00")
            .with_location("main.rs", None);

        assert_eq!(record.funcname, TOP_LEVEL_FUNCTION);
        assert_eq!(record.filename, "main.rs");
        assert_eq!(record.call_stack, CallStack::Disabled);
        assert_eq!(record.call_stack.path(), None);
    }
}
