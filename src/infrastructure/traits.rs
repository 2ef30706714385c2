//! I/O boundary traits for testability
//!
//! These traits abstract the standard streams, process termination, the
//! filesystem and interactive line editing, allowing the console, log file
//! and error interceptor to be tested with in-memory implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Standard stream abstraction.
pub trait Terminal: Send + Sync {
    /// Write text to standard output and flush it.
    fn write_out(&self, text: &str) -> io::Result<()>;

    /// Write text to standard error and flush it.
    fn write_err(&self, text: &str) -> io::Result<()>;

    /// Read one line from standard input, at most `limit` bytes.
    /// Returns None at end of input.
    fn read_line(&self, limit: usize) -> io::Result<Option<String>>;
}

/// Process termination abstraction.
pub trait Terminator: Send + Sync {
    /// End the process with the given exit status. Never returns.
    fn terminate(&self, code: i32) -> !;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;

    /// Create the file if it does not exist. Never truncates.
    fn touch(&self, path: &Path) -> io::Result<()>;

    /// Append content to the file, creating it if needed.
    fn append(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Interactive line editor abstraction (history, cursor movement).
pub trait LineEditor {
    /// Show `prompt` and read one edited line.
    /// Returns None if the user ends input (Ctrl-D / Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Read one line of at most `limit` bytes and strip its terminator.
///
/// Bytes past the limit stay in the reader for the next call.
pub fn read_bounded_line<R: BufRead>(reader: R, limit: usize) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    let read = reader.take(limit as u64).read_until(b'\n', &mut buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real terminal backed by the process's standard streams.
#[derive(Debug, Default)]
pub struct StdTerminal;

impl Terminal for StdTerminal {
    fn write_out(&self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        err.write_all(text.as_bytes())?;
        err.flush()
    }

    fn read_line(&self, limit: usize) -> io::Result<Option<String>> {
        read_bounded_line(io::stdin().lock(), limit)
    }
}

/// Real terminator calling `std::process::exit`.
#[derive(Debug, Default)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn touch(&self, path: &Path) -> io::Result<()> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(|_| ())
    }

    fn append(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(content.as_bytes())
    }
}

/// Real line editor using rustyline.
#[cfg(feature = "readline")]
pub struct RustylineEditor {
    editor: rustyline::DefaultEditor,
}

#[cfg(feature = "readline")]
impl RustylineEditor {
    pub fn new() -> io::Result<Self> {
        let editor = rustyline::DefaultEditor::new().map_err(readline_err)?;
        Ok(Self { editor })
    }
}

#[cfg(feature = "readline")]
impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        use rustyline::error::ReadlineError;

        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    // history is best effort
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(readline_err(e)),
        }
    }
}

#[cfg(feature = "readline")]
fn readline_err(e: rustyline::error::ReadlineError) -> io::Error {
    match e {
        rustyline::error::ReadlineError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

/// The enhanced line editor, if one is available in this build and session.
///
/// Requires the `readline` feature and an interactive terminal on both
/// stdin and stdout.
pub fn enhanced_line_editor() -> Option<Box<dyn LineEditor>> {
    #[cfg(feature = "readline")]
    {
        use std::io::IsTerminal;

        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            match RustylineEditor::new() {
                Ok(editor) => return Some(Box::new(editor)),
                Err(e) => tracing::debug!("line editor unavailable: {}", e),
            }
        }
    }
    None
}
