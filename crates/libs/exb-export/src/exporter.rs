//! The exporter contract consumed by the test harness.

use std::path::PathBuf;

use exb_config::ToolchainFlags;

use crate::build::{BuildInvocation, BuildResult};
use crate::prelude::*;

/// Everything needed to export one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Target device, e.g. `K64F`.
    pub target: String,
    /// IDE id, e.g. `make_gcc_arm`.
    pub ide: String,
    /// Project name, usually the test program name.
    pub project_name: String,
    /// Program index in the catalog. Its source directories are used when
    /// `sources` is empty.
    pub project_id: Option<usize>,
    /// Source directories to export.
    pub sources: Vec<PathBuf>,
    /// Directory the project is generated into. Removed first if it exists.
    pub export_path: PathBuf,
    /// When set, the export directory is also packed into an archive of this
    /// name, placed inside the export directory.
    pub archive_name: Option<String>,
    /// Flags of the IDE's compiler toolchain.
    pub build_profile: ToolchainFlags,
}

/// An exported project, ready to be built.
#[derive(Debug)]
pub struct ExportedProject {
    pub name: String,
    pub export_dir: PathBuf,
    pub archive: Option<PathBuf>,
    /// Files generated for this project, in generation order. Callers may
    /// append files they expect the build to produce.
    pub generated_files: Vec<PathBuf>,
    pub invocation: BuildInvocation,
}

impl ExportedProject {
    /// Run the project's build tool. See [`BuildInvocation::invoke`].
    pub fn build(&self) -> Result<BuildResult> {
        self.invocation.invoke()
    }
}

/// Outcome of an export that did not hit an environment error.
#[derive(Debug)]
pub enum ExportResult {
    Exported(ExportedProject),
    /// The target cannot be built with the requested toolchain. Holds the
    /// reason.
    Unsupported(String),
}

/// Generates projects for external build tools.
pub trait ProjectExporter: Send + Sync {
    /// Generate the project described by `request`.
    ///
    /// Returns [`ExportResult::Unsupported`] without touching the filesystem
    /// when the target/IDE pair cannot be built. An `Err` is fatal to the
    /// whole test run.
    fn export(&self, request: &ExportRequest) -> Result<ExportResult>;

    /// Compiler toolchain used by an IDE id.
    fn exporter_toolchain(&self, ide: &str) -> Result<String>;
}
