//! Severity-aware error interceptor
//!
//! Every reported [`Signal`] is classified by its [`Severity`]:
//! - `Fatal`: print the fatal banner and the message, then terminate
//! - `Warning`: print at normal verbosity, handled
//! - `Notice`: print at verbose verbosity, handled
//! - `Unrecognized`: untouched, left to the caller's default reporting
//!
//! Panics are routed through the same fatal path while the process-wide
//! hook is installed (see [`ErrorInterceptor::install`]).

use std::any::Any;
use std::panic::{self, PanicHookInfo};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::console::render_message;
use crate::application::{ApplicationError, ApplicationResult, Console};
use crate::domain::{Disposition, FatalKind, Severity, Signal, Verbosity, LINE_ENDING};
use crate::infrastructure::traits::{Terminal, Terminator};

/// First line printed for every fatal signal.
pub const FATAL_BANNER: &str = "ERROR: cannot continue!";

static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Classifies signals and acts on them.
#[derive(Clone)]
pub struct ErrorInterceptor {
    terminal: Arc<dyn Terminal>,
    terminator: Arc<dyn Terminator>,
}

impl ErrorInterceptor {
    pub fn new(terminal: Arc<dyn Terminal>, terminator: Arc<dyn Terminator>) -> Self {
        Self {
            terminal,
            terminator,
        }
    }

    /// Act on `signal`. Fatal signals never return.
    pub fn handle(&self, signal: &Signal, console: &Console) -> Disposition {
        match &signal.severity {
            Severity::Fatal(kind) => self.fatal(*kind, &signal.message),
            Severity::Warning => {
                console.print_message(&signal.message, Verbosity::Normal);
                Disposition::Handled
            }
            Severity::Notice => {
                console.print_message(&signal.message, Verbosity::Verbose);
                Disposition::Handled
            }
            Severity::Unrecognized(label) => {
                debug!("passing through unrecognized severity: {}", label);
                Disposition::Unhandled
            }
        }
    }

    /// Print the fatal report to stdout and terminate with the kind's exit code.
    pub fn fatal(&self, kind: FatalKind, message: &str) -> ! {
        let text = format!("{}{}{}", FATAL_BANNER, LINE_ENDING, render_message(message));
        self.exit_with(&text, kind.exit_code())
    }

    /// Print `text` to stdout as is and terminate with `code`.
    pub fn exit_with(&self, text: &str, code: i32) -> ! {
        if let Err(e) = self.terminal.write_out(text) {
            warn!("could not write final output: {}", e);
        }
        self.terminator.terminate(code)
    }

    /// Register this interceptor as the process-wide panic hook.
    ///
    /// Only one hook can be installed at a time; the returned handle restores
    /// the previous hook on [`InstalledHook::uninstall`].
    pub fn install(&self) -> ApplicationResult<InstalledHook> {
        if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(ApplicationError::InterceptorInstalled);
        }

        let previous = panic::take_hook();
        let interceptor = self.clone();
        panic::set_hook(Box::new(move |info| {
            interceptor.fatal(FatalKind::Internal, &panic_message(info));
        }));
        debug!("error interceptor installed");

        Ok(InstalledHook { previous })
    }
}

/// Handle to the installed panic hook.
pub struct InstalledHook {
    previous: PanicHook,
}

impl InstalledHook {
    /// Restore the hook that was active before installation.
    pub fn uninstall(self) {
        let _ours = panic::take_hook();
        panic::set_hook(self.previous);
        HOOK_INSTALLED.store(false, Ordering::SeqCst);
        debug!("error interceptor uninstalled");
    }
}

/// Whether a panic hook from [`ErrorInterceptor::install`] is active.
pub fn is_installed() -> bool {
    HOOK_INSTALLED.load(Ordering::SeqCst)
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let text = payload_text(info.payload());
    match info.location() {
        Some(location) => format!(
            "panic at {}:{}: {}",
            location.file(),
            location.line(),
            text
        ),
        None => format!("panic: {}", text),
    }
}

fn payload_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "non-string panic payload"
    }
}
