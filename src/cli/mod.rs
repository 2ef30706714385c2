//! CLI layer: the demo application's arguments and command dispatch

pub mod args;
pub mod commands;
pub mod error;

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};
