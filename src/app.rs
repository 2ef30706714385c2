//! `CliApp`: the base every concrete command-line application builds on
//!
//! A concrete application supplies its `clap` argument type and drives the
//! app from `main`:
//!
//! ```ignore
//! let mut app: CliApp<MyArgs> = CliApp::new();
//! app.print("hello");
//! app.log_message("started");
//! ```
//!
//! Construction never returns an error. Anything that goes wrong while the
//! app is being built is reported as a fatal signal and ends the process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, instrument, warn};

use crate::application::{
    default_log_path, ApplicationError, ApplicationResult, Console, ErrorInterceptor,
    InstalledHook, LogFile, RuntimeEnv,
};
use crate::cli::CliError;
use crate::config::Settings;
use crate::domain::{Disposition, FatalKind, Signal, Verbosity};
use crate::exitcode;
use crate::infrastructure::traits::{ProcessTerminator, StdTerminal};
use crate::infrastructure::ServiceContainer;

/// Base command-line application, generic over the parsed argument type.
pub struct CliApp<A> {
    args: A,
    settings: Arc<Settings>,
    runtime: RuntimeEnv,
    console: Console,
    log: LogFile,
    interceptor: ErrorInterceptor,
    hook: Option<InstalledHook>,
}

impl<A: Parser> CliApp<A> {
    /// Build the app from the process's own arguments.
    pub fn new() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Build the app from `argv` with real I/O, installing the panic hook.
    pub fn from_args<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let interceptor = ErrorInterceptor::new(Arc::new(StdTerminal), Arc::new(ProcessTerminator));
        let hook = match interceptor.install() {
            Ok(hook) => Some(hook),
            Err(e) => {
                // a hook from an earlier app is still active; keep it
                warn!("{}", e);
                None
            }
        };

        let settings = Settings::load().unwrap_or_else(|e| startup_failure(&interceptor, e));
        let services = ServiceContainer::new(settings);

        Self::build(argv, services, interceptor, hook)
    }

    /// Build the app on the given services. No panic hook is installed.
    pub fn with_services<I, T>(argv: I, services: ServiceContainer) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let interceptor =
            ErrorInterceptor::new(services.terminal.clone(), services.terminator.clone());
        Self::build(argv, services, interceptor, None)
    }

    #[instrument(level = "debug", skip_all)]
    fn build<I, T>(
        argv: I,
        services: ServiceContainer,
        interceptor: ErrorInterceptor,
        hook: Option<InstalledHook>,
    ) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let ServiceContainer {
            settings,
            terminal,
            fs,
            line_editor,
            ..
        } = services;

        let runtime =
            RuntimeEnv::prepare(&settings).unwrap_or_else(|e| startup_failure(&interceptor, e));

        let args = parse_args::<A, I, T>(argv, &interceptor);

        let console = Console::new(terminal, settings.verbosity, line_editor);
        let log = LogFile::new(
            settings.log_file.clone(),
            default_log_path(&runtime.binary_path),
            fs,
        );
        debug!("app ready, verbosity {}", settings.verbosity);

        Self {
            args,
            settings,
            runtime,
            console,
            log,
            interceptor,
            hook,
        }
    }
}

/// Report an error raised while building the app, classified like [`CliApp::fail`].
fn startup_failure(interceptor: &ErrorInterceptor, err: ApplicationError) -> ! {
    let err = CliError::from(err);
    interceptor.fatal(err.fatal_kind(), &err.to_string())
}

fn parse_args<A, I, T>(argv: I, interceptor: &ErrorInterceptor) -> A
where
    A: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match A::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                interceptor.exit_with(&e.render().to_string(), exitcode::OK)
            }
            _ => interceptor.fatal(FatalKind::User, e.render().to_string().trim_end()),
        },
    }
}

impl<A> CliApp<A> {
    /// Parsed command-line arguments.
    pub fn args(&self) -> &A {
        &self.args
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn runtime(&self) -> &RuntimeEnv {
        &self.runtime
    }

    /// Path of the running executable.
    pub fn binary_path(&self) -> &Path {
        &self.runtime.binary_path
    }

    /// Working directory at startup.
    pub fn working_directory(&self) -> &Path {
        &self.runtime.working_directory
    }

    pub fn verbosity(&self) -> Verbosity {
        self.console.verbosity()
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.console.set_verbosity(verbosity);
    }

    /// Log file path, once the first message has been written.
    pub fn log_path(&self) -> Option<&Path> {
        self.log.path()
    }

    /// Use `path` for the log file. Fails once the log has been written to.
    pub fn set_log_file(&mut self, path: PathBuf) -> ApplicationResult<()> {
        self.log.configure(path)
    }

    /// Whether `read_line` uses the interactive line editor.
    pub fn has_line_editor(&self) -> bool {
        self.console.has_line_editor()
    }

    /// Read one line from the user, after showing `prompt`.
    /// Returns None at end of input.
    pub fn read_line(&mut self, prompt: Option<&str>) -> ApplicationResult<Option<String>> {
        self.console.read_line(prompt)
    }

    /// Append `message` to the log file; write errors are only traced.
    pub fn log_message(&self, message: &str) {
        if let Err(e) = self.try_log_message(message) {
            warn!("log write failed: {}", e);
        }
    }

    /// Append `message` to the log file, surfacing write errors.
    pub fn try_log_message(&self, message: &str) -> ApplicationResult<()> {
        self.log.append(message)
    }

    /// Print `message` if `level` passes the current verbosity.
    pub fn print_message(&self, message: &str, level: Verbosity) {
        self.console.print_message(message, level);
    }

    /// Print `message` at normal level.
    pub fn print(&self, message: &str) {
        self.print_message(message, Verbosity::Normal);
    }

    /// Route `signal` through the interceptor; unhandled signals get the
    /// default report on stderr.
    pub fn report(&self, signal: Signal) -> Disposition {
        let disposition = self.interceptor.handle(&signal, &self.console);
        if disposition == Disposition::Unhandled {
            self.console.report_unhandled(&signal);
        }
        disposition
    }

    pub fn warn(&self, message: impl Into<String>) -> Disposition {
        self.report(Signal::warning(message))
    }

    pub fn notice(&self, message: impl Into<String>) -> Disposition {
        self.report(Signal::notice(message))
    }

    /// Report a fatal failure and end the process.
    pub fn fatal(&self, kind: FatalKind, message: &str) -> ! {
        self.interceptor.fatal(kind, message)
    }

    /// Report `err` as fatal and end the process.
    pub fn fail(&self, err: &CliError) -> ! {
        self.fatal(err.fatal_kind(), &err.to_string())
    }

    /// Remove the process-wide panic hook installed at construction.
    /// Returns false if this app did not install one.
    pub fn uninstall_interceptor(&mut self) -> bool {
        match self.hook.take() {
            Some(hook) => {
                hook.uninstall();
                true
            }
            None => false,
        }
    }
}

impl<A: Parser> Default for CliApp<A> {
    fn default() -> Self {
        Self::new()
    }
}
