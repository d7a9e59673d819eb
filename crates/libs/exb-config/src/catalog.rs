//! Top level catalog loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;
use crate::program::Program;
use crate::target::Target;
use crate::toolchain::{Compiler, Ide};

/// Global catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Catalog format version.
    pub version: String,
    /// Directory holding the `TESTS/<group>/<case>` tree of the newer releases.
    /// Relative paths are resolved against the SDK root.
    #[serde(default)]
    pub tests_root: Option<PathBuf>,
}

/// One SDK release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Release version, e.g. `"2"` or `"5"`.
    pub version: String,
    #[serde(default)]
    pub description: String,
}

/// All lookup tables used to generate and validate a test matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub global: GlobalConfig,
    /// Known releases, oldest first. The last one is the default.
    pub releases: Vec<Release>,
    pub targets: Vec<Target>,
    pub compilers: Vec<Compiler>,
    pub ides: Vec<Ide>,
    /// Test programs of the older releases, addressed by index or by name.
    #[serde(default)]
    pub programs: Vec<Program>,
}

impl Catalog {
    /// Load the catalog from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        debug!("Loaded catalog {:?}", file_path);
        Self::from_toml(&contents)
    }

    /// Parse the catalog from a TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Newest release in the catalog.
    pub fn latest_release(&self) -> Result<&Release> {
        self.releases.last().ok_or(Error::NoReleases)
    }

    pub fn release(&self, version: &str) -> Result<&Release> {
        self.releases
            .iter()
            .find(|release| release.version == version)
            .ok_or_else(|| Error::UnknownRelease(version.to_string()))
    }

    /// Release versions in catalog order.
    pub fn release_versions(&self) -> Vec<&str> {
        self.releases.iter().map(|r| r.version.as_str()).collect()
    }

    /// Targets that are part of the given release, in catalog order.
    pub fn targets_in_release(&self, version: &str) -> Vec<&Target> {
        self.targets
            .iter()
            .filter(|target| target.in_release(version))
            .collect()
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|target| target.name == name)
    }

    pub fn compiler(&self, name: &str) -> Option<&Compiler> {
        self.compilers.iter().find(|compiler| compiler.name == name)
    }

    pub fn ide(&self, id: &str) -> Option<&Ide> {
        self.ides.iter().find(|ide| ide.id == id)
    }

    /// IDE ids in catalog order.
    pub fn ide_ids(&self) -> Vec<&str> {
        self.ides.iter().map(|ide| ide.id.as_str()).collect()
    }

    pub fn program(&self, id: usize) -> Option<&Program> {
        self.programs.iter().find(|program| program.id == id)
    }

    pub fn program_by_name(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|program| program.name == name)
    }
}
