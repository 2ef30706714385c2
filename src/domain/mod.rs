//! Domain layer: severity taxonomy, verbosity levels and text wrapping
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod severity;
pub mod verbosity;
pub mod wrap;

pub use error::DomainError;
pub use severity::{Disposition, FatalKind, Severity, Signal};
pub use verbosity::Verbosity;
pub use wrap::{word_wrap, LINE_ENDING, WRAP_WIDTH};
