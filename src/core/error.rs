//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Severity token that matches no known level
    #[error("Unknown log severity: '{token}'")]
    UnknownSeverity { token: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File lock error
    #[error("Failed to acquire file lock on '{path}'")]
    FileLockError { path: String },

    /// An appender panicked while writing or flushing
    #[error("Appender '{appender}' panicked: {message}")]
    AppenderPanicked { appender: String, message: String },

    /// The process-wide logger was already installed
    #[error("Global logger already initialized")]
    AlreadyInitialized,
}

impl LoggerError {
    /// Create an unknown severity error
    pub fn unknown_severity(token: impl Into<String>) -> Self {
        LoggerError::UnknownSeverity {
            token: token.into(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an appender panic error
    pub fn appender_panicked(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AppenderPanicked {
            appender: appender.into(),
            message: message.into(),
        }
    }

    /// Create a file lock error
    pub fn file_lock(path: impl Into<String>) -> Self {
        LoggerError::FileLockError { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::unknown_severity("X");
        assert!(matches!(err, LoggerError::UnknownSeverity { .. }));

        let err = LoggerError::config("level", "not a severity");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::unknown_severity("X");
        assert_eq!(err.to_string(), "Unknown log severity: 'X'");

        let err = LoggerError::config("LOGGING_STDOUT", "expected a boolean, got 'maybe'");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for LOGGING_STDOUT: expected a boolean, got 'maybe'"
        );

        let err = LoggerError::appender_panicked("file:app.log", "disk gone");
        assert_eq!(err.to_string(), "Appender 'file:app.log' panicked: disk gone");

        let err = LoggerError::file_lock("/tmp/app.log");
        assert_eq!(err.to_string(), "Failed to acquire file lock on '/tmp/app.log'");

        assert_eq!(
            LoggerError::AlreadyInitialized.to_string(),
            "Global logger already initialized"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("appending to log file", "cannot open file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("appending to log file"));
        assert!(err.to_string().contains("cannot open file"));
    }
}
