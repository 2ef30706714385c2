//! Append-only plain text log file

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::LINE_ENDING;
use crate::infrastructure::traits::FileSystem;

/// Default log file: `<binary dir>/<binary stem>.log`.
pub fn default_log_path(binary_path: &Path) -> PathBuf {
    let stem = binary_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    let dir = binary_path.parent().unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}.log", stem))
}

/// One message per line, appended in call order.
///
/// The path is resolved on the first write and never changes afterwards.
/// The file is opened and closed for every message.
pub struct LogFile {
    configured: Option<PathBuf>,
    default_path: PathBuf,
    resolved: OnceCell<PathBuf>,
    fs: Arc<dyn FileSystem>,
}

impl LogFile {
    pub fn new(configured: Option<PathBuf>, default_path: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            configured,
            default_path,
            resolved: OnceCell::new(),
            fs,
        }
    }

    /// The resolved path, once a message has been written.
    pub fn path(&self) -> Option<&Path> {
        self.resolved.get().map(PathBuf::as_path)
    }

    /// Point the log at `path`. Fails once the log has been written to.
    pub fn configure(&mut self, path: PathBuf) -> ApplicationResult<()> {
        if let Some(current) = self.resolved.get() {
            return Err(ApplicationError::LogPathFixed(current.clone()));
        }
        self.configured = Some(path);
        Ok(())
    }

    /// Append `message` and a line terminator.
    #[instrument(level = "debug", skip(self))]
    pub fn append(&self, message: &str) -> ApplicationResult<()> {
        let path = self.resolve()?;
        self.fs
            .append(path, &format!("{}{}", message, LINE_ENDING))
            .with_path_context("append to log file", path)
    }

    fn resolve(&self) -> ApplicationResult<&Path> {
        if let Some(path) = self.resolved.get() {
            return Ok(path.as_path());
        }

        let path = self
            .resolved
            .get_or_init(|| self.configured.clone().unwrap_or_else(|| self.default_path.clone()));
        if !self.fs.exists(path) {
            debug!("creating log file: {}", path.display());
            self.fs
                .ensure_parent(path)
                .with_path_context("create log directory", path)?;
            self.fs.touch(path).with_path_context("create log file", path)?;
        }
        Ok(path.as_path())
    }
}
