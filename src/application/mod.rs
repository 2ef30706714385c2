//! Application layer: console, log file, error interception and runtime setup
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod console;
pub mod environment;
pub mod error;
pub mod error_ext;
pub mod interceptor;
pub mod logfile;

pub use console::{Console, READ_LIMIT};
pub use environment::{LimitChange, LimitOutcome, RuntimeEnv};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use interceptor::{ErrorInterceptor, InstalledHook, FATAL_BANNER};
pub use logfile::{default_log_path, LogFile};
