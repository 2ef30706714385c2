//! Test support: logging setup and in-memory I/O boundaries
//!
//! `BufferTerminal` captures stdout/stderr and serves scripted stdin.
//! `RecordingTerminator` records the exit status and unwinds with a
//! [`Terminated`] payload instead of ending the process, so fatal paths can
//! be observed with `std::panic::catch_unwind`.

use std::env;
use std::io::{self, Cursor};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{read_bounded_line, Terminal, Terminator};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["rustyline"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// In-memory terminal.
#[derive(Debug, Default)]
pub struct BufferTerminal {
    out: Mutex<String>,
    err: Mutex<String>,
    input: Mutex<Cursor<Vec<u8>>>,
}

impl BufferTerminal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminal whose stdin yields `input`.
    pub fn with_input(input: &str) -> Self {
        Self {
            input: Mutex::new(Cursor::new(input.as_bytes().to_vec())),
            ..Self::default()
        }
    }

    /// Everything written to stdout so far.
    pub fn stdout(&self) -> String {
        self.out.lock().unwrap().clone()
    }

    /// Everything written to stderr so far.
    pub fn stderr(&self) -> String {
        self.err.lock().unwrap().clone()
    }
}

impl Terminal for BufferTerminal {
    fn write_out(&self, text: &str) -> io::Result<()> {
        self.out.lock().unwrap().push_str(text);
        Ok(())
    }

    fn write_err(&self, text: &str) -> io::Result<()> {
        self.err.lock().unwrap().push_str(text);
        Ok(())
    }

    fn read_line(&self, limit: usize) -> io::Result<Option<String>> {
        let mut input = self.input.lock().unwrap();
        read_bounded_line(&mut *input, limit)
    }
}

/// Unwind payload raised by [`RecordingTerminator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminated(pub i32);

/// Terminator that records exit statuses instead of exiting.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit statuses requested so far.
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) -> ! {
        self.codes.lock().unwrap().push(code);
        panic::resume_unwind(Box::new(Terminated(code)))
    }
}

/// Run `f`, returning the exit status if it terminated through a
/// [`RecordingTerminator`]. Other panics are propagated.
pub fn catch_termination<R>(f: impl FnOnce() -> R) -> Result<R, i32> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<Terminated>() {
            Ok(terminated) => Err(terminated.0),
            Err(other) => panic::resume_unwind(other),
        },
    }
}
