//! Catalog driven exporter for every configured IDE.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use exb_config::{Catalog, IdeKind};
use tracing::{debug, info};

use crate::archive::create_archive;
use crate::context::ProjectContext;
use crate::exporter::{ExportRequest, ExportResult, ExportedProject, ProjectExporter};
use crate::makefile::MakeFlavor;
use crate::prelude::*;
use crate::resources::Resources;
use crate::{command, makefile};

/// Log file written by builds that do not configure another one.
pub const BUILD_LOG: &str = "build_log.txt";

/// Exports projects for the IDEs of a catalog.
#[derive(Debug, Clone)]
pub struct Exporters {
    catalog: Arc<Catalog>,
    /// Relative source directories are resolved against this root.
    sdk_root: PathBuf,
}

impl Exporters {
    pub fn new(catalog: Arc<Catalog>, sdk_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            sdk_root: sdk_root.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn sources(&self, request: &ExportRequest) -> Result<Vec<PathBuf>> {
        let sources = if !request.sources.is_empty() {
            request.sources.clone()
        } else if let Some(id) = request.project_id {
            self.catalog
                .program(id)
                .ok_or(Error::UnknownProgram(id))?
                .source_dirs
                .clone()
        } else {
            Vec::new()
        };
        Ok(sources
            .into_iter()
            .map(|source| self.sdk_root.join(source))
            .collect())
    }
}

fn prepare_export_dir(path: &Path) -> Result<()> {
    if path.exists() {
        debug!("Removing previous export {:?}", path);
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

impl ProjectExporter for Exporters {
    fn exporter_toolchain(&self, ide: &str) -> Result<String> {
        self.catalog
            .ide(ide)
            .map(|ide| ide.toolchain.clone())
            .ok_or_else(|| Error::UnknownIde(ide.to_string()))
    }

    fn export(&self, request: &ExportRequest) -> Result<ExportResult> {
        let ide = self
            .catalog
            .ide(&request.ide)
            .ok_or_else(|| Error::UnknownIde(request.ide.clone()))?;
        let target = self
            .catalog
            .target(&request.target)
            .ok_or_else(|| Error::UnknownTarget(request.target.clone()))?;

        if !target.supports(&ide.toolchain) {
            return Ok(ExportResult::Unsupported(format!(
                "Target {} does not support toolchain {} used by {}",
                target.name, ide.toolchain, ide.id
            )));
        }

        let compiler = self
            .catalog
            .compiler(&ide.toolchain)
            .ok_or_else(|| Error::UnknownCompiler(ide.toolchain.clone()))?;
        let flavor = match ide.kind {
            IdeKind::Makefile => Some(
                MakeFlavor::from_toolchain(&ide.toolchain)
                    .ok_or_else(|| Error::NoMakefileFlavor(ide.toolchain.clone()))?,
            ),
            IdeKind::Command => None,
        };
        let sources = self.sources(request)?;

        let export_dir = &request.export_path;
        prepare_export_dir(export_dir)?;
        let resources = Resources::export(&sources, export_dir, &compiler.linker_ext)?;
        let context = ProjectContext {
            name: &request.project_name,
            target,
            compiler,
            flags: &request.build_profile,
            resources: &resources,
            export_dir,
        };
        let mut generated_files = vec![match flavor {
            Some(flavor) => makefile::generate(&context, flavor)?,
            None => command::generate(&context, ide)?,
        }];

        let archive = match &request.archive_name {
            Some(name) => {
                let archive = export_dir.join(name);
                let prefix = Path::new(name)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| request.project_name.clone());
                create_archive(export_dir, &archive, &prefix)?;
                generated_files.push(archive.clone());
                Some(archive)
            }
            None => None,
        };

        // Archived projects are built from their extracted copy
        let project_dir = archive
            .as_ref()
            .map(|archive| archive.with_extension(""))
            .unwrap_or_else(|| export_dir.clone());
        let log_path = export_dir.join(ide.log.as_deref().unwrap_or(BUILD_LOG));
        let invocation = match flavor {
            Some(_) => makefile::invocation(&request.project_name, &project_dir, log_path),
            None => command::invocation(ide, &request.project_name, &project_dir, log_path)?,
        };

        info!(
            "Exported {} for {} with {} to {:?}",
            request.project_name, target.name, ide.id, export_dir
        );
        Ok(ExportResult::Exported(ExportedProject {
            name: request.project_name.clone(),
            export_dir: export_dir.clone(),
            archive,
            generated_files,
            invocation,
        }))
    }
}
