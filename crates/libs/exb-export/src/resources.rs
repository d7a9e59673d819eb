//! Source scanning for exported projects.
//!
//! Walks the source directories of a test, copies every file into the export
//! directory and classifies it by extension. Paths are kept relative to the
//! export directory with `/` separators so they can be written verbatim into
//! generated project files.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::prelude::*;

/// Directories never exported: build output, test trees of other tests and
/// version control metadata.
pub const IGNORED_DIRS: &[&str] = &["BUILD", "TESTS", ".git", ".hg", ".svn"];

/// Classified files of an exported project.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resources {
    pub c_sources: Vec<String>,
    pub cpp_sources: Vec<String>,
    pub s_sources: Vec<String>,
    pub headers: Vec<String>,
    /// Directories containing headers.
    pub inc_dirs: BTreeSet<String>,
    pub libraries: Vec<String>,
    /// Directories containing libraries.
    pub lib_dirs: BTreeSet<String>,
    /// Prebuilt object files.
    pub objects: Vec<String>,
    pub hex_files: Vec<String>,
    pub linker_script: Option<String>,
}

fn to_unix(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return String::from(".");
    }
    parts.join("/")
}

fn is_ignored(entry: &DirEntry, excluded: &Path) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if entry.file_type().is_dir() {
        let name = entry.file_name().to_string_lossy();
        return IGNORED_DIRS.contains(&name.as_ref()) || entry.path().starts_with(excluded);
    }
    false
}

impl Resources {
    /// Copy every file below `sources` into `export_dir` and classify it.
    ///
    /// `export_dir` must exist. Files are copied to the same path relative to
    /// the source directory they were found in.
    ///
    /// Export directories are siblings below a common export root, the parent
    /// of `export_dir`. Everything below that root is skipped, so neither this
    /// export nor the exports of other tests are copied back in. A source
    /// lying inside the export root only skips `export_dir` itself.
    ///
    /// # Arguments
    ///
    /// * `sources` - Source directories, in priority order
    /// * `export_dir` - Destination directory
    /// * `linker_ext` - Linker script extension of the toolchain, e.g. `.ld`
    pub fn export(sources: &[PathBuf], export_dir: &Path, linker_ext: &str) -> Result<Self> {
        let export_dir = export_dir.canonicalize()?;
        let export_root = export_dir.parent().unwrap_or(&export_dir).to_path_buf();
        let mut resources = Resources::default();

        for source in sources {
            let source = match source.canonicalize() {
                Ok(source) => source,
                Err(err) => {
                    warn!("Skipping source directory {:?} - {err}", source);
                    continue;
                }
            };
            let excluded = if source.starts_with(&export_root) {
                &export_dir
            } else {
                &export_root
            };
            let walker = WalkDir::new(&source)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !is_ignored(entry, excluded));

            for entry in walker {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(relative) = entry.path().strip_prefix(&source) else {
                    continue;
                };
                let destination = export_dir.join(relative);
                if let Some(parent) = destination.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &destination)?;
                resources.add(relative, linker_ext);
            }
        }

        debug!(
            "Exported {} C, {} C++ and {} assembly sources to {:?}",
            resources.c_sources.len(),
            resources.cpp_sources.len(),
            resources.s_sources.len(),
            export_dir
        );
        Ok(resources)
    }

    fn add(&mut self, relative: &Path, linker_ext: &str) {
        let file = to_unix(relative);
        let dir = to_unix(relative.parent().unwrap_or(Path::new("")));
        let ext = relative
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        match ext.as_str() {
            ".c" => self.c_sources.push(file),
            ".cpp" | ".cc" | ".cxx" => self.cpp_sources.push(file),
            ".s" | ".S" => self.s_sources.push(file),
            ".h" | ".hpp" => {
                self.headers.push(file);
                self.inc_dirs.insert(dir);
            }
            ".a" | ".ar" => {
                self.libraries.push(file);
                self.lib_dirs.insert(dir);
            }
            ".o" => self.objects.push(file),
            ".hex" => self.hex_files.push(file),
            ext if ext == linker_ext => match &self.linker_script {
                Some(existing) => debug!("Ignoring linker script {file}, using {existing}"),
                None => self.linker_script = Some(file),
            },
            _ => {}
        }
    }

    /// Sources compiled by the project, in a stable order.
    pub fn sources(&self) -> impl Iterator<Item = &String> {
        self.s_sources
            .iter()
            .chain(self.c_sources.iter())
            .chain(self.cpp_sources.iter())
    }
}
