//! Build invocation for exported projects.
//!
//! Runs the build tool bound to an exported project, stores its output in a
//! build log and classifies the exit status. The log has the layout:
//!
//! ```text
//! ==========OUT==========
//! <stdout>
//! ==========ERR==========
//! <stderr>
//! SUCCESS | FAILURE
//! ```

use std::{
    fmt,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use exb_io::runner::{RunOutput, Runner};
use strip_ansi_escapes::strip;
use tracing::{debug, info};

use crate::prelude::*;

/// Status text for exit codes without an entry in [`MAKE_EXIT_CODES`].
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Marker ending the log of a successful build.
pub const SUCCESS_MARKER: &str = "SUCCESS";

/// Marker ending the log of a failed build.
pub const FAILURE_MARKER: &str = "FAILURE";

/// Descriptions of the exit codes of `make`.
pub const MAKE_EXIT_CODES: &[(i32, &str)] = &[
    (0, "Normal exit with no errors."),
    (1, "General purpose error if no other explicit error is known."),
    (2, "There was an error in the makefile."),
    (3, "A shell line had a non-zero status."),
    (4, "Make ran out of memory."),
    (5, "The program specified on the shell line was not executable."),
    (6, "The shell line was longer than the command processor allowed."),
    (7, "The program specified on the shell line could not be found."),
    (8, "There was not enough memory to execute the shell line."),
    (9, "The shell line produced a device error."),
    (10, "The program specified on the shell line became resident."),
    (11, "The shell line produced an unknown error."),
    (15, "There was a problem with the memory miser."),
    (16, "The user hit CTRL+C or CTRL+BREAK."),
];

/// Describe an exit code. Processes killed by a signal have no code.
pub fn describe_exit_code(code: Option<i32>) -> &'static str {
    code.and_then(|code| {
        MAKE_EXIT_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, text)| *text)
    })
    .unwrap_or(UNKNOWN_STATUS)
}

/// A build tool exited with a non-zero status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFailure {
    pub project: String,
    /// Exit code, `None` if the tool was killed by a signal.
    pub code: Option<i32>,
    pub status: &'static str,
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Project: {} build failed with the status: {}",
            self.project, self.status
        )
    }
}

/// Outcome of a build that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResult {
    /// The tool exited with 0. Holds the status message.
    Succeeded(String),
    Failed(BuildFailure),
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Succeeded(_))
    }
}

/// The build command of one exported project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    project_name: String,
    runner: Runner,
    log_path: PathBuf,
}

impl BuildInvocation {
    /// # Arguments
    ///
    /// * `project_name` - Name used in status messages
    /// * `runner` - The build tool command line
    /// * `log_path` - Where the build log is written
    pub fn new(project_name: impl Into<String>, runner: Runner, log_path: PathBuf) -> Self {
        Self {
            project_name: project_name.into(),
            runner,
            log_path,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Run the build tool, write the build log and classify the exit status.
    ///
    /// Blocks until the tool terminates. A non-zero exit is returned as
    /// [`BuildResult::Failed`]; an `Err` means the tool could not be run at
    /// all or the log could not be written.
    pub fn invoke(&self) -> Result<BuildResult> {
        info!(
            "Building {} with {}",
            self.project_name,
            self.runner.get_full_command()
        );
        let output = self.runner.run()?;
        write_build_log(&self.log_path, &output)?;
        debug!("Build log written to {:?}", self.log_path);

        match output.code() {
            Some(0) => Ok(BuildResult::Succeeded(format!(
                "Project: {} build succeeded with the status: {}",
                self.project_name,
                describe_exit_code(Some(0))
            ))),
            code => Ok(BuildResult::Failed(BuildFailure {
                project: self.project_name.clone(),
                code,
                status: describe_exit_code(code),
            })),
        }
    }
}

fn strip_ansi_codes(input: &str) -> String {
    String::from_utf8_lossy(&strip(input.as_bytes())).to_string()
}

fn banner(title: &str) -> String {
    format!("{0}{title}{0}\n", "=".repeat(10))
}

/// Write the captured output of a build to `path`, creating parent
/// directories as needed.
pub fn write_build_log(path: &Path, output: &RunOutput) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(banner("OUT").as_bytes())?;
    writer.write_all(strip_ansi_codes(&output.stdout).as_bytes())?;
    writer.write_all(banner("ERR").as_bytes())?;
    writer.write_all(strip_ansi_codes(&output.stderr).as_bytes())?;
    let marker = if output.success() {
        SUCCESS_MARKER
    } else {
        FAILURE_MARKER
    };
    writer.write_all(marker.as_bytes())?;
    writer.flush()?;
    Ok(())
}
