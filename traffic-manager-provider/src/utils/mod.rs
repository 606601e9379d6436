//! Utility modules.

/// Log sanitization utilities to prevent token and secret exposure.
pub mod log_sanitizer;
