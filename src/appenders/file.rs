//! File appender implementation
//!
//! The file is opened in append mode for every line and closed right after,
//! so no handle outlives a single write.

use crate::core::{Appender, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct FileAppender {
    path: PathBuf,
    name: String,
}

impl FileAppender {
    /// Create an appender for `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", self.path.display()),
                    e,
                )
            })
    }

    #[cfg(feature = "file")]
    fn write_locked(&self, file: &mut File, bytes: &[u8]) -> Result<()> {
        fs2::FileExt::lock_exclusive(&*file)
            .map_err(|_| LoggerError::file_lock(self.path.display().to_string()))?;
        let written = file.write_all(bytes);
        let _ = fs2::FileExt::unlock(&*file);
        written.map_err(|e| {
            LoggerError::io_operation(
                "appending to log file",
                format!("write to '{}' failed", self.path.display()),
                e,
            )
        })
    }

    #[cfg(not(feature = "file"))]
    fn write_locked(&self, file: &mut File, bytes: &[u8]) -> Result<()> {
        file.write_all(bytes).map_err(|e| {
            LoggerError::io_operation(
                "appending to log file",
                format!("write to '{}' failed", self.path.display()),
                e,
            )
        })
    }
}

impl Appender for FileAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut file = self.open()?;

        let mut output = String::with_capacity(line.len() + 1);
        output.push_str(line);
        output.push('\n');

        self.write_locked(&mut file, output.as_bytes())
    }

    fn flush(&mut self) -> Result<()> {
        // Nothing is buffered between writes.
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_created_on_first_write() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");

        let mut appender = FileAppender::new(&path);
        assert!(!path.exists());

        appender.append("first")?;
        assert_eq!(fs::read_to_string(&path)?, "first\n");
        Ok(())
    }

    #[test]
    fn test_appends_preserve_existing_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n")?;

        let mut appender = FileAppender::new(&path);
        appender.append("second")?;
        appender.append("third")?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["existing", "second", "third"]);
        Ok(())
    }

    #[test]
    fn test_unwritable_path_errors() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing-dir").join("app.log");

        let mut appender = FileAppender::new(&path);
        let err = appender.append("lost").unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        Ok(())
    }

    #[test]
    fn test_name_includes_path() {
        let appender = FileAppender::new("logging.log");
        assert_eq!(appender.name(), "file:logging.log");
        assert_eq!(appender.path(), Path::new("logging.log"));
    }
}
