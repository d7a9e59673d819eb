//! Target device definitions.

use serde::{Deserialize, Serialize};

/// A target device and the compiler toolchains it can be built with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Target name, e.g. `K64F`.
    pub name: String,
    /// Compiler toolchains able to build this target (`GCC_ARM`, `ARM`, `IAR`).
    pub supported_toolchains: Vec<String>,
    /// Releases this target is officially part of.
    pub release_versions: Vec<String>,
    /// Additional labels, most specific last. Used to pick target specific
    /// Makefile variants.
    #[serde(default)]
    pub extra_labels: Vec<String>,
}

impl Target {
    pub fn supports(&self, toolchain: &str) -> bool {
        self.supported_toolchains.iter().any(|t| t == toolchain)
    }

    pub fn in_release(&self, version: &str) -> bool {
        self.release_versions.iter().any(|v| v == version)
    }
}
