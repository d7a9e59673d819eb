//! Test cases and the test matrix.

use std::path::{Path, PathBuf};

use exb_config::{Catalog, Program};

/// IDE whose build log lands in a `build/` subdirectory.
const UVISION: &str = "uvision";

/// A test program to export and build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestProgram {
    /// A catalog program, sources resolved by the exporter from its id.
    Classic { id: usize, name: String },
    /// An OS test case built from explicit source directories.
    OsTest { name: String, sources: Vec<PathBuf> },
}

impl TestProgram {
    pub fn classic(program: &Program) -> Self {
        TestProgram::Classic {
            id: program.id,
            name: program.name.clone(),
        }
    }

    /// An OS test case found in `dir`, built together with the SDK at `root`.
    pub fn os_test(name: impl Into<String>, dir: &Path, root: &Path) -> Self {
        TestProgram::OsTest {
            name: name.into(),
            sources: vec![dir.to_path_buf(), root.to_path_buf()],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TestProgram::Classic { name, .. } | TestProgram::OsTest { name, .. } => name,
        }
    }
}

/// One (target, IDE, program) combination.
///
/// Built once and never changed afterwards; the harness only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    target: String,
    ide: String,
    name: String,
    id: Option<usize>,
    sources: Vec<PathBuf>,
    log: PathBuf,
    archive: bool,
}

impl TestCase {
    /// The log location and archiving follow from the IDE id: `uvision`
    /// logs to `build/build_log.txt`, every other IDE to `build_log.txt`,
    /// and Makefile based IDEs (id containing `make`) are archived.
    pub fn new(target: impl Into<String>, ide: impl Into<String>, program: &TestProgram) -> Self {
        let ide = ide.into();
        let log = if ide == UVISION {
            PathBuf::from("build").join(exb_export::registry::BUILD_LOG)
        } else {
            PathBuf::from(exb_export::registry::BUILD_LOG)
        };
        let archive = ide.contains("make");
        let (id, sources) = match program {
            TestProgram::Classic { id, .. } => (Some(*id), Vec::new()),
            TestProgram::OsTest { sources, .. } => (None, sources.clone()),
        };
        Self {
            target: target.into(),
            ide,
            name: program.name().to_string(),
            id,
            sources,
            log,
            archive,
        }
    }

    /// Override the log location, relative to the export directory.
    pub fn with_log(self, log: impl Into<PathBuf>) -> Self {
        Self {
            log: log.into(),
            ..self
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn ide(&self) -> &str {
        &self.ide
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Build log path relative to the export directory.
    pub fn log(&self) -> &Path {
        &self.log
    }

    pub fn archive(&self) -> bool {
        self.archive
    }

    /// `<target>::<ide>\t<name>`, used in reports.
    pub fn descriptor(&self) -> String {
        format!("{}::{}\t{}", self.target, self.ide, self.name)
    }

    /// `<target>_<ide>_<name>`, the export directory and archive name.
    pub fn export_name(&self) -> String {
        format!("{}_{}_{}", self.target, self.ide, self.name)
    }

    /// Archive file name, if the case is archived.
    pub fn archive_name(&self) -> Option<String> {
        self.archive.then(|| format!("{}.zip", self.export_name()))
    }
}

/// Every combination of `targets`, `ides` and `programs`, ordered by target,
/// then IDE, then program.
///
/// IDEs the catalog configures a log location for use it instead of the
/// default one.
pub fn test_matrix(
    targets: &[String],
    ides: &[String],
    programs: &[TestProgram],
    catalog: &Catalog,
) -> Vec<TestCase> {
    let mut cases = Vec::with_capacity(targets.len() * ides.len() * programs.len());
    for target in targets {
        for ide in ides {
            let log = catalog.ide(ide).and_then(|ide| ide.log.clone());
            for program in programs {
                let case = TestCase::new(target.as_str(), ide.as_str(), program);
                cases.push(match &log {
                    Some(log) => case.with_log(log),
                    None => case,
                });
            }
        }
    }
    cases
}
