//! Runtime environment setup
//!
//! Before a command runs, the process is prepared:
//! 1. soft CPU-time and address-space limits are lifted to their hard maximum
//! 2. `TZ` is set to the configured default if no timezone is configured
//! 3. the working directory and binary path are recorded

use std::env;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;

/// What happened to one resource limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitOutcome {
    /// Soft limit was raised to the hard limit
    Raised,
    /// Soft limit already equal to the hard limit
    Unchanged,
    /// The limit could not be read or changed
    Failed(String),
    /// Limit handling disabled by settings or unsupported on this platform
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitChange {
    pub resource: &'static str,
    pub outcome: LimitOutcome,
}

/// Facts recorded while preparing the process.
#[derive(Debug, Clone)]
pub struct RuntimeEnv {
    pub binary_path: PathBuf,
    pub working_directory: PathBuf,
    /// Timezone in effect after setup
    pub timezone: String,
    pub limits: Vec<LimitChange>,
    pub started_at: DateTime<Utc>,
}

impl RuntimeEnv {
    /// Apply environment setup, then record working directory and binary path.
    #[instrument(level = "debug", skip(settings))]
    pub fn prepare(settings: &Settings) -> ApplicationResult<Self> {
        let limits = if settings.raise_limits {
            raise_limits()
        } else {
            vec![LimitChange {
                resource: "all",
                outcome: LimitOutcome::Skipped,
            }]
        };
        for change in &limits {
            if let LimitOutcome::Failed(reason) = &change.outcome {
                warn!("could not lift {} limit: {}", change.resource, reason);
            }
        }

        let timezone = ensure_timezone(&settings.default_timezone);

        let working_directory = env::current_dir().with_context("read working directory")?;
        let binary_path = env::current_exe().with_context("locate running binary")?;
        debug!(
            "binary: {}, cwd: {}, tz: {}",
            binary_path.display(),
            working_directory.display(),
            timezone
        );

        Ok(Self {
            binary_path,
            working_directory,
            timezone,
            limits,
            started_at: Utc::now(),
        })
    }
}

/// The timezone to install, if the current one is unset or empty.
pub fn resolve_timezone(current: Option<&str>, default: &str) -> Option<String> {
    match current {
        Some(tz) if !tz.trim().is_empty() => None,
        _ => Some(default.to_string()),
    }
}

/// Set `TZ` to `default` unless a timezone is configured; returns the one in effect.
fn ensure_timezone(default: &str) -> String {
    let current = env::var("TZ").ok();
    match resolve_timezone(current.as_deref(), default) {
        Some(tz) => {
            // std::env serializes writes; parallel apps in tests only race on the value
            env::set_var("TZ", &tz);
            debug!("TZ not configured, defaulting to {}", tz);
            tz
        }
        None => current.unwrap_or_default(),
    }
}

#[cfg(unix)]
fn raise_limits() -> Vec<LimitChange> {
    vec![
        LimitChange {
            resource: "cpu",
            outcome: rlimit::lift(libc::RLIMIT_CPU),
        },
        LimitChange {
            resource: "address-space",
            outcome: rlimit::lift(libc::RLIMIT_AS),
        },
    ]
}

#[cfg(not(unix))]
fn raise_limits() -> Vec<LimitChange> {
    vec![LimitChange {
        resource: "all",
        outcome: LimitOutcome::Skipped,
    }]
}

#[cfg(unix)]
mod rlimit {
    use std::io;

    use super::LimitOutcome;

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    type Resource = libc::__rlimit_resource_t;
    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    type Resource = libc::c_int;

    pub(super) fn lift(resource: Resource) -> LimitOutcome {
        let mut limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: getrlimit only writes into the struct we pass
        if unsafe { libc::getrlimit(resource, &mut limit) } != 0 {
            return LimitOutcome::Failed(io::Error::last_os_error().to_string());
        }
        if limit.rlim_cur == limit.rlim_max {
            return LimitOutcome::Unchanged;
        }

        let lifted = libc::rlimit {
            rlim_cur: limit.rlim_max,
            rlim_max: limit.rlim_max,
        };
        // SAFETY: setrlimit only reads the struct we pass
        if unsafe { libc::setrlimit(resource, &lifted) } != 0 {
            return LimitOutcome::Failed(io::Error::last_os_error().to_string());
        }
        LimitOutcome::Raised
    }
}
