//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// General failure raised by application code
pub const FAILURE: i32 = 1;

/// Internal software error
pub const SOFTWARE: i32 = 70;
