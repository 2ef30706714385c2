//! Verbosity levels gating user-facing output

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// How much user-facing output is shown.
///
/// Levels are ordered: a message printed at `level` is shown when
/// `level <= verbosity`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verbosity {
    /// No messages
    Silent = 0,
    /// Basic messages
    #[default]
    Normal = 1,
    /// All messages
    Verbose = 2,
}

impl Verbosity {
    /// Raise the level by `steps`, saturating at `Verbose`.
    pub fn raised(self, steps: u8) -> Self {
        let level = u8::from(self).saturating_add(steps).min(Verbosity::Verbose as u8);
        // in range after the clamp above
        Verbosity::try_from(level).unwrap_or(Verbosity::Verbose)
    }

    /// Whether a message at `level` passes this threshold.
    pub fn allows(self, level: Verbosity) -> bool {
        level <= self
    }
}

impl TryFrom<u8> for Verbosity {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Verbosity::Silent),
            1 => Ok(Verbosity::Normal),
            2 => Ok(Verbosity::Verbose),
            other => Err(DomainError::InvalidVerbosity(other)),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(value: Verbosity) -> Self {
        value as u8
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verbosity::Silent => "silent",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
        };
        write!(f, "{} ({})", name, u8::from(*self))
    }
}
