//! Severity taxonomy for reported error signals

use std::fmt;

use crate::exitcode;

/// Which kind of unrecoverable failure ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FatalKind {
    /// A failure inside the program itself (panics, broken environment)
    Internal,
    /// A failure triggered by the user or raised deliberately by application code
    User,
}

impl FatalKind {
    /// Process exit status for this kind of fatal failure.
    pub fn exit_code(self) -> i32 {
        match self {
            FatalKind::Internal => exitcode::SOFTWARE,
            FatalKind::User => exitcode::FAILURE,
        }
    }
}

/// Classification of a reported signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    Fatal(FatalKind),
    Warning,
    Notice,
    /// A label outside the taxonomy; left to default reporting
    Unrecognized(String),
}

impl Severity {
    /// Classify a textual severity label (case-insensitive).
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "fatal" | "error" => Severity::Fatal(FatalKind::Internal),
            "user-error" | "user-fatal" => Severity::Fatal(FatalKind::User),
            "warning" | "warn" => Severity::Warning,
            "notice" | "info" => Severity::Notice,
            _ => Severity::Unrecognized(label.to_string()),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Severity::Fatal(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal(FatalKind::Internal) => write!(f, "fatal"),
            Severity::Fatal(FatalKind::User) => write!(f, "user-error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Notice => write!(f, "notice"),
            Severity::Unrecognized(label) => write!(f, "{}", label),
        }
    }
}

/// A message reported to the error interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub severity: Severity,
    pub message: String,
}

impl Signal {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn fatal(kind: FatalKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal(kind), message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(Severity::Notice, message)
    }
}

/// Whether the interceptor dealt with a signal.
///
/// `Unhandled` tells the caller to fall through to its default reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Handled,
    Unhandled,
}
