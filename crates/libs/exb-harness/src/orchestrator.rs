//! Export and build orchestration.
//!
//! A test run goes through two phases:
//!
//! 1. Every test case is exported by a [`WorkerPool`]. Unsupported
//!    target/IDE pairs are recorded as skipped and produce no build unit.
//! 2. The exported projects are built one after the other, since each build
//!    tool is expected to use every available core. Archived projects are
//!    extracted first. After each build the log is echoed, moved next to the
//!    export directories and, with `clean`, the export directory is removed.
//!
//! Any [`Error`] aborts the run. Per test problems are recorded in the
//! [`ResultSets`] instead.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use exb_config::extract_profile;
use exb_export::{
    BuildResult, ExportRequest, ExportResult, ExportedProject, ProjectExporter,
    archive::extract_archive,
};
use tracing::{debug, error, info, warn};

use crate::pool::{DEFAULT_POOL_SIZE, WorkerPool};
use crate::prelude::*;
use crate::progress::Progress;
use crate::results::{BuildOutcome, ResultSets};
use crate::test_case::TestCase;

/// Default root of the export directories.
pub const DEFAULT_EXPORT_ROOT: &str = "BUILD/export";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessOptions {
    /// Every test case is exported to `<export_root>/<export name>`.
    pub export_root: PathBuf,
    /// Remove each export directory once its build is done.
    pub clean: bool,
    /// Build profile files, merged in order.
    pub profiles: Vec<PathBuf>,
    /// Number of export workers.
    pub jobs: usize,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            export_root: PathBuf::from(DEFAULT_EXPORT_ROOT),
            clean: false,
            profiles: Vec::new(),
            jobs: DEFAULT_POOL_SIZE,
        }
    }
}

/// An exported project waiting for its build.
#[derive(Debug)]
pub struct BuildUnit {
    pub test_case: TestCase,
    pub project: ExportedProject,
}

/// Result of exporting one test case.
#[derive(Debug)]
pub enum ExportStep {
    Queued(BuildUnit),
    Skipped(TestCase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Initialized,
    Exporting,
    Building,
    Reported,
}

/// Exports, builds and reports a list of test cases.
#[derive(Debug)]
pub struct ExportBuildTest<E> {
    exporter: E,
    tests: Vec<TestCase>,
    options: HarnessOptions,
    progress: Arc<Progress>,
    results: ResultSets,
    state: HarnessState,
}

impl<E: ProjectExporter> ExportBuildTest<E> {
    pub fn new(
        exporter: E,
        tests: Vec<TestCase>,
        options: HarnessOptions,
        progress: Arc<Progress>,
    ) -> Self {
        Self {
            exporter,
            tests,
            options,
            progress,
            results: ResultSets::new(),
            state: HarnessState::Initialized,
        }
    }

    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn results(&self) -> &ResultSets {
        &self.results
    }

    pub fn into_results(self) -> ResultSets {
        self.results
    }

    fn export_path(&self, test_case: &TestCase) -> PathBuf {
        self.options.export_root.join(test_case.export_name())
    }

    /// Export one test case.
    ///
    /// The expected build log is appended to the project's generated files.
    pub fn perform_export(&self, test_case: TestCase) -> Result<ExportStep> {
        self.progress
            .advance(format_args!("Exporting test case  {}", test_case.descriptor()));

        let toolchain = self.exporter.exporter_toolchain(test_case.ide())?;
        let build_profile = extract_profile(&self.options.profiles, &toolchain)?;
        let export_path = self.export_path(&test_case);
        let request = ExportRequest {
            target: test_case.target().to_string(),
            ide: test_case.ide().to_string(),
            project_name: test_case.name().to_string(),
            project_id: test_case.id(),
            sources: test_case.sources().to_vec(),
            export_path: export_path.clone(),
            archive_name: test_case.archive_name(),
            build_profile,
        };

        match self.exporter.export(&request)? {
            ExportResult::Exported(mut project) => {
                project.generated_files.push(export_path.join(test_case.log()));
                Ok(ExportStep::Queued(BuildUnit { test_case, project }))
            }
            ExportResult::Unsupported(reason) => {
                info!("Skipping {}: {}", test_case.descriptor(), reason);
                Ok(ExportStep::Skipped(test_case))
            }
        }
    }

    /// Export every test case on the worker pool and return the build units.
    ///
    /// Skipped test cases are recorded immediately.
    pub fn perform_exports(&mut self) -> Result<Vec<BuildUnit>> {
        self.state = HarnessState::Exporting;
        self.progress.reset(self.tests.len());
        let pool = WorkerPool::new(self.options.jobs);
        info!(
            "Exporting {} test cases with {} workers",
            self.tests.len(),
            pool.size()
        );

        let steps = pool.run(self.tests.clone(), |test_case| {
            self.perform_export(test_case)
        })?;

        let mut units = Vec::with_capacity(steps.len());
        for step in steps {
            match step {
                ExportStep::Queued(unit) => units.push(unit),
                ExportStep::Skipped(test_case) => {
                    self.results.record(&test_case, &BuildOutcome::Unsupported)
                }
            }
        }
        Ok(units)
    }

    /// Build one exported project and record its outcome.
    pub fn build_unit(&mut self, unit: BuildUnit) -> Result<BuildOutcome> {
        let BuildUnit { test_case, project } = unit;
        self.progress
            .advance(format_args!("Building test case  {}", test_case.descriptor()));

        if let Some(archive) = &project.archive {
            extract_archive(archive, &self.export_path(&test_case))?;
        } else if test_case.archive() {
            warn!("{} was not archived by its exporter", test_case.descriptor());
        }

        let outcome = match project.build()? {
            BuildResult::Succeeded(status) => {
                info!("{}", status);
                BuildOutcome::Success
            }
            BuildResult::Failed(failure) => {
                error!("{}", failure);
                BuildOutcome::Failure(failure.status.to_string())
            }
        };
        self.results.record(&test_case, &outcome);

        if let Some(log) = project.generated_files.last() {
            relocate_log(
                log,
                &project.export_dir,
                &self.options.export_root,
                &self.progress,
            );
        }

        if self.options.clean {
            debug!("Cleaning {:?}", project.export_dir);
            fs::remove_dir_all(&project.export_dir)?;
        }
        Ok(outcome)
    }

    /// Export then build every test case.
    pub fn batch_tests(&mut self) -> Result<&ResultSets> {
        let units = self.perform_exports()?;

        self.state = HarnessState::Building;
        self.progress.reset(units.len());
        info!("Building {} exported projects", units.len());
        for unit in units {
            self.build_unit(unit)?;
        }

        self.state = HarnessState::Reported;
        Ok(&self.results)
    }
}

/// Echo a build log and move it to `<export_root>/<export dir name>_log.txt`,
/// replacing any previous log there.
///
/// Log handling never fails a test run: problems are only logged. Returns the
/// new location on success.
pub fn relocate_log(
    log: &Path,
    export_dir: &Path,
    export_root: &Path,
    progress: &Progress,
) -> Option<PathBuf> {
    let name = export_dir.file_name()?.to_string_lossy();
    let destination = export_root.join(format!("{name}_log.txt"));

    let relocate = || -> io::Result<()> {
        let contents = fs::read_to_string(log)?;
        progress.print(log.display());
        progress.print(&contents);
        if destination.exists() {
            fs::remove_file(&destination)?;
        }
        fs::rename(log, &destination)
    };

    match relocate() {
        Ok(()) => {
            debug!("Moved {:?} to {:?}", log, destination);
            Some(destination)
        }
        Err(err) => {
            warn!("Couldn't relocate build log {:?}: {}", log, err);
            None
        }
    }
}
