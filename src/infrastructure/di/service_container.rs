//! Service container for dependency injection
//!
//! Wires the console, log file and error interceptor to their I/O boundaries.

use std::sync::Arc;

use crate::config::Settings;
use crate::infrastructure::traits::{
    enhanced_line_editor, FileSystem, LineEditor, ProcessTerminator, RealFileSystem, StdTerminal,
    Terminal, Terminator,
};

/// Container holding the settings and I/O boundaries a `CliApp` runs on.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Standard streams
    pub terminal: Arc<dyn Terminal>,

    /// Process termination
    pub terminator: Arc<dyn Terminator>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Enhanced line editor, when one is available
    pub line_editor: Option<Box<dyn LineEditor>>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(StdTerminal),
            Arc::new(ProcessTerminator),
            Arc::new(RealFileSystem),
        )
        .with_line_editor(enhanced_line_editor())
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// No line editor is configured; input falls back to raw reads.
    pub fn with_deps(
        settings: Settings,
        terminal: Arc<dyn Terminal>,
        terminator: Arc<dyn Terminator>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            terminal,
            terminator,
            fs,
            line_editor: None,
        }
    }

    /// Replace the line editor.
    pub fn with_line_editor(mut self, editor: Option<Box<dyn LineEditor>>) -> Self {
        self.line_editor = editor;
        self
    }
}
