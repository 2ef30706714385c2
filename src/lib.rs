//! clibase: a minimal base for command-line applications
//!
//! A concrete application defines its own `clap` argument struct and drives a
//! [`CliApp`] built from it. The app parses arguments, prepares the runtime
//! environment, routes error signals through a severity-aware interceptor and
//! offers wrapped console output, line input and a plain log file.
//!
//! Layers:
//! - `domain`: pure values (severity, verbosity, word wrapping)
//! - `application`: console, log file, interceptor, runtime setup
//! - `infrastructure`: I/O boundary traits and the service container
//! - `cli`: the demo binary's arguments and commands

pub mod app;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use app::CliApp;
pub use application::{ApplicationError, ApplicationResult};
pub use cli::{CliError, CliResult};
pub use domain::{Disposition, FatalKind, Severity, Signal, Verbosity};
