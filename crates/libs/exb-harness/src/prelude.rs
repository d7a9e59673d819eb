//! Common types and utilities.

/// Harness error type.
pub use crate::error::Error;

/// Harness result type.
pub type Result<T> = core::result::Result<T, Error>;
