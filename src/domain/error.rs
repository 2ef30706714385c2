//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid values.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid verbosity level: {0} (expected 0, 1 or 2)")]
    InvalidVerbosity(u8),
}
