//! Verbosity-gated console output and line input

use std::sync::Arc;

use colored::Colorize;
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{word_wrap, Signal, Verbosity, LINE_ENDING, WRAP_WIDTH};
use crate::infrastructure::traits::{LineEditor, Terminal};

/// Maximum number of bytes read per line when no line editor is available.
pub const READ_LIMIT: usize = 1024;

/// Format a message for the console: wrapped at [`WRAP_WIDTH`] when longer,
/// every line followed by the line terminator.
pub fn render_message(message: &str) -> String {
    if message.chars().count() > WRAP_WIDTH {
        let mut text = word_wrap(message, WRAP_WIDTH).join(LINE_ENDING);
        text.push_str(LINE_ENDING);
        text
    } else {
        format!("{}{}", message, LINE_ENDING)
    }
}

/// User-facing console: wrapped output gated by verbosity, and line input.
pub struct Console {
    terminal: Arc<dyn Terminal>,
    verbosity: Verbosity,
    line_editor: Option<Box<dyn LineEditor>>,
}

impl Console {
    pub fn new(
        terminal: Arc<dyn Terminal>,
        verbosity: Verbosity,
        line_editor: Option<Box<dyn LineEditor>>,
    ) -> Self {
        Self {
            terminal,
            verbosity,
            line_editor,
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Whether `read_line` goes through the line editor.
    pub fn has_line_editor(&self) -> bool {
        self.line_editor.is_some()
    }

    /// Print `message` to stdout if `level` passes the verbosity threshold.
    pub fn print_message(&self, message: &str, level: Verbosity) {
        if !self.verbosity.allows(level) {
            return;
        }
        if let Err(e) = self.terminal.write_out(&render_message(message)) {
            debug!("stdout write failed: {}", e);
        }
    }

    /// Default report for a signal the interceptor left unhandled.
    pub fn report_unhandled(&self, signal: &Signal) {
        let text = format!(
            "{}: unhandled {} signal: {}{}",
            "Warning".yellow(),
            signal.severity,
            signal.message,
            LINE_ENDING
        );
        if let Err(e) = self.terminal.write_err(&text) {
            debug!("stderr write failed: {}", e);
        }
    }

    /// Read one line of input, showing `prompt` first.
    ///
    /// Uses the line editor when present; otherwise writes the prompt without
    /// a newline and reads at most [`READ_LIMIT`] bytes from stdin.
    /// Returns None at end of input.
    pub fn read_line(&mut self, prompt: Option<&str>) -> ApplicationResult<Option<String>> {
        if let Some(editor) = self.line_editor.as_mut() {
            return editor
                .read_line(prompt.unwrap_or_default())
                .with_context("read line from editor");
        }

        if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
            self.terminal.write_out(prompt).with_context("write prompt")?;
        }
        self.terminal
            .read_line(READ_LIMIT)
            .with_context("read line from stdin")
    }
}
