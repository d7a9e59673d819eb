#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use exb_export::{
    BuildInvocation, ExportRequest, ExportResult, ExportedProject, ProjectExporter,
    archive::create_archive, error::Error as ExportError, registry::BUILD_LOG,
};
use exb_harness::{TestCase, TestProgram};
use exb_io::runner::Runner;

/// How the fake exporter treats a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Export a project whose build exits with this code.
    Build(i32),
    Unsupported,
    /// Fail the export with an environment error.
    Fatal,
}

/// Exporter writing a dummy project built by `sh`.
#[derive(Debug, Default)]
pub struct FakeExporter {
    behaviors: HashMap<String, Behavior>,
    pub exports: AtomicUsize,
}

impl FakeExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: &str, behavior: Behavior) -> Self {
        self.behaviors.insert(target.to_string(), behavior);
        self
    }

    pub fn export_count(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }
}

impl ProjectExporter for FakeExporter {
    fn export(&self, request: &ExportRequest) -> exb_export::prelude::Result<ExportResult> {
        self.exports.fetch_add(1, Ordering::SeqCst);
        let code = match self
            .behaviors
            .get(&request.target)
            .copied()
            .unwrap_or(Behavior::Build(0))
        {
            Behavior::Build(code) => code,
            Behavior::Unsupported => {
                return Ok(ExportResult::Unsupported(format!(
                    "{} has no {}",
                    request.target, request.ide
                )));
            }
            Behavior::Fatal => return Err(ExportError::UnknownTarget(request.target.clone())),
        };

        let export_dir = request.export_path.clone();
        if export_dir.exists() {
            fs::remove_dir_all(&export_dir)?;
        }
        fs::create_dir_all(&export_dir)?;
        let makefile = export_dir.join("Makefile");
        fs::write(&makefile, "all:\n")?;
        let mut generated_files = vec![makefile];

        let archive = match &request.archive_name {
            Some(name) => {
                let archive = export_dir.join(name);
                let stem = Path::new(name)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default();
                create_archive(&export_dir, &archive, &stem)?;
                generated_files.push(archive.clone());
                Some(archive)
            }
            None => None,
        };
        let project_dir = archive
            .as_ref()
            .map(|archive| archive.with_extension(""))
            .unwrap_or_else(|| export_dir.clone());
        let log = if request.ide == "uvision" {
            Path::new("build").join(BUILD_LOG)
        } else {
            Path::new(BUILD_LOG).to_path_buf()
        };

        let script = format!(
            "test -f Makefile && echo building {} && echo warning >&2; exit {code}",
            request.project_name
        );
        let runner = Runner::new("sh", vec![String::from("-c"), script]).current_dir(project_dir);
        Ok(ExportResult::Exported(ExportedProject {
            name: request.project_name.clone(),
            export_dir: export_dir.clone(),
            archive,
            generated_files,
            invocation: BuildInvocation::new(&request.project_name, runner, export_dir.join(log)),
        }))
    }

    fn exporter_toolchain(&self, _ide: &str) -> exb_export::prelude::Result<String> {
        Ok(String::from("GCC_ARM"))
    }
}

/// Cloneable in-memory writer for progress output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("poisoned buffer")).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("poisoned buffer").write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn blinky() -> TestProgram {
    TestProgram::Classic {
        id: 0,
        name: String::from("MBED_BLINKY"),
    }
}

pub fn case(target: &str, ide: &str) -> TestCase {
    TestCase::new(target, ide, &blinky())
}
