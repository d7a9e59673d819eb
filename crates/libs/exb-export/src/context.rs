use std::path::Path;

use exb_config::{Compiler, Target, ToolchainFlags};

use crate::resources::Resources;

/// Inputs shared by every project generator.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    pub name: &'a str,
    pub target: &'a Target,
    pub compiler: &'a Compiler,
    pub flags: &'a ToolchainFlags,
    pub resources: &'a Resources,
    pub export_dir: &'a Path,
}

impl ProjectContext<'_> {
    /// Preprocessor symbols identifying the target, its labels and the
    /// toolchain.
    pub fn symbols(&self) -> Vec<String> {
        std::iter::once(&self.target.name)
            .chain(self.target.extra_labels.iter())
            .map(|label| format!("TARGET_{label}"))
            .chain(std::iter::once(format!("TOOLCHAIN_{}", self.compiler.name)))
            .collect()
    }
}
