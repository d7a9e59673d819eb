//! Exporters for IDEs built through a vendor command line.
//!
//! The generated project file is a JSON descriptor of the project. The IDE's
//! configured build command receives its path through the `{project}`
//! placeholder.

use std::{
    fs,
    path::{Path, PathBuf},
};

use exb_config::{Ide, ToolchainFlags};
use exb_io::runner::Runner;
use serde::Serialize;
use tracing::debug;

use crate::build::BuildInvocation;
use crate::context::ProjectContext;
use crate::prelude::*;

/// Placeholder for the project name in project file names.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Placeholder for the project file path in build commands.
pub const PROJECT_PLACEHOLDER: &str = "{project}";

#[derive(Debug, Serialize)]
struct ProjectDescriptor<'a> {
    name: &'a str,
    target: &'a str,
    toolchain: &'a str,
    sources: Vec<&'a String>,
    include_paths: Vec<&'a String>,
    libraries: &'a [String],
    objects: &'a [String],
    linker_script: Option<&'a str>,
    symbols: Vec<String>,
    flags: &'a ToolchainFlags,
}

/// Project file name of `ide` for a project.
pub fn project_file_name(ide: &Ide, project_name: &str) -> Result<String> {
    let template = ide
        .project_file
        .as_ref()
        .ok_or_else(|| Error::MissingProjectFile(ide.id.clone()))?;
    Ok(template.replace(NAME_PLACEHOLDER, project_name))
}

/// Write the project descriptor into the export directory.
pub fn generate(context: &ProjectContext<'_>, ide: &Ide) -> Result<PathBuf> {
    let resources = context.resources;
    let descriptor = ProjectDescriptor {
        name: context.name,
        target: &context.target.name,
        toolchain: &context.compiler.name,
        sources: resources.sources().collect(),
        include_paths: resources.inc_dirs.iter().collect(),
        libraries: &resources.libraries,
        objects: &resources.objects,
        linker_script: resources.linker_script.as_deref(),
        symbols: context.symbols(),
        flags: context.flags,
    };
    let path = context
        .export_dir
        .join(project_file_name(ide, context.name)?);
    fs::write(&path, serde_json::to_string_pretty(&descriptor)?)?;
    debug!("Generated {:?} for {}", path, ide.id);
    Ok(path)
}

/// The IDE's build command for a project generated in `project_dir`.
pub fn invocation(
    ide: &Ide,
    project_name: &str,
    project_dir: &Path,
    log_path: PathBuf,
) -> Result<BuildInvocation> {
    let project_file = project_dir.join(project_file_name(ide, project_name)?);
    let project_file = project_file.to_string_lossy();
    let mut argv = ide
        .build_command
        .iter()
        .map(|arg| arg.replace(PROJECT_PLACEHOLDER, &project_file));
    let program = argv
        .next()
        .ok_or_else(|| Error::MissingBuildCommand(ide.id.clone()))?;
    let runner = Runner::new(program, argv.collect::<Vec<String>>()).current_dir(project_dir);
    Ok(BuildInvocation::new(project_name, runner, log_path))
}
