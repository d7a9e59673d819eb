//! Configuration error types.

use std::path::PathBuf;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// Walking the test directory failed.
    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),

    /// Build profile JSON could not be parsed.
    #[error("Invalid build profile {path:?} - {source}")]
    Profile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A release version was requested that the catalog does not know about.
    #[error("Unknown release {0}")]
    UnknownRelease(String),

    /// The catalog does not define any release.
    #[error("The catalog does not define any release")]
    NoReleases,
}
