//! Common types and utilities.

/// Export error type.
pub use crate::error::Error;

/// Export result type.
pub type Result<T> = core::result::Result<T, Error>;
