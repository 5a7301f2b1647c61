//! Exit codes reported to Helm
//!
//! Helm only distinguishes success from failure, so every error maps to `1`.

/// Success - operation completed without errors
pub const SUCCESS: u8 = 0;

/// Any failure
pub const ERROR: u8 = 1;
