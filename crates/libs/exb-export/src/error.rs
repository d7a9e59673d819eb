//! Export error types.
//!
//! Every variant here is fatal to a test run: it means the environment or
//! the catalog is broken. Unsupported target/toolchain pairs and failed
//! builds are reported as values instead, see [`crate::ExportResult`] and
//! [`crate::BuildResult`].

use exb_io::process::ProcessError;

/// Export errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] exb_config::error::Error),

    /// The build tool could not be started or waited for.
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("Unknown IDE {0}")]
    UnknownIde(String),

    #[error("Unknown target {0}")]
    UnknownTarget(String),

    #[error("No compiler definition for toolchain {0}")]
    UnknownCompiler(String),

    #[error("Toolchain {0} has no Makefile exporter")]
    NoMakefileFlavor(String),

    #[error("IDE {0} has no project file name")]
    MissingProjectFile(String),

    #[error("IDE {0} has no build command")]
    MissingBuildCommand(String),

    #[error("Unknown program id {0}")]
    UnknownProgram(usize),
}
