//! Process exit codes (errno compatible)
//!
//! Executors may return any other integer; it is passed through unchanged.

/// Successful termination
pub const OK: i32 = 0;

/// Unknown argument, unknown command or any other parser failure
pub const NOT_FOUND: i32 = libc::ENOENT;

/// Command was interrupted
pub const CANCELED: i32 = libc::ECANCELED;

/// Unhandled failure inside a command (including panics)
pub const NOT_RECOVERABLE: i32 = libc::ENOTRECOVERABLE;
