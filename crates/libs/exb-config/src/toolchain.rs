//! Compiler toolchain and IDE exporter definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Command lines of a compiler toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    /// Toolchain name: `GCC_ARM`, `ARM` or `IAR`.
    pub name: String,
    /// C compiler argv.
    pub cc: Vec<String>,
    /// C++ compiler argv.
    pub cppc: Vec<String>,
    /// Assembler argv.
    pub asm: Vec<String>,
    /// Linker argv.
    pub ld: Vec<String>,
    /// Tool converting the linked image into a binary.
    pub elf2bin: String,
    /// Extension of this toolchain's linker scripts, including the dot.
    pub linker_ext: String,
}

/// How an IDE id is exported and built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdeKind {
    /// A generated Makefile built with `make`.
    Makefile,
    /// A generated IDE project built with a vendor command line.
    Command,
}

impl fmt::Display for IdeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdeKind::Makefile => write!(f, "makefile"),
            IdeKind::Command => write!(f, "command"),
        }
    }
}

/// User facing exporter id and the toolchain behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ide {
    /// Exporter id as given on the command line, e.g. `make_gcc_arm`.
    pub id: String,
    /// Compiler toolchain used by this exporter.
    pub toolchain: String,
    pub kind: IdeKind,
    /// Project file name for command exporters. `{name}` is replaced by the
    /// project name.
    #[serde(default)]
    pub project_file: Option<String>,
    /// Build argv for command exporters. `{project}` is replaced by the path
    /// of the generated project file.
    #[serde(default)]
    pub build_command: Vec<String>,
    /// Build log location relative to the export directory.
    #[serde(default)]
    pub log: Option<String>,
}
