//! High-level process runner capturing complete output.

use std::{
    path::{Path, PathBuf},
    process::ExitStatus,
};

use tracing::debug;

use crate::process::{ProcessError, capture_output, spawn_process};

/// Output of a finished process.
#[derive(Debug)]
pub struct RunOutput {
    /// Everything written to stdout, decoded lossily.
    pub stdout: String,
    /// Everything written to stderr, decoded lossily.
    pub stderr: String,
    pub status: ExitStatus,
}

impl RunOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Runs a command to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Runner {
    /// Command to execute.
    command: String,
    /// Command line arguments.
    args: Vec<String>,
    /// Working directory of the child.
    current_dir: Option<PathBuf>,
}

impl Runner {
    /// Create a new runner with command and arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use exb_io::runner::Runner;
    ///
    /// let runner = Runner::new("make", vec!["-C", "project", "-j"]);
    /// ```
    pub fn new(command: impl Into<String>, args: Vec<impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(|a| a.into()).collect(),
            current_dir: None,
        }
    }

    /// Create a new runner with just a command (no arguments).
    pub fn new_without_args(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Run the command from `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Get the full command string with arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use exb_io::runner::Runner;
    ///
    /// let runner = Runner::new("make", vec!["-j"]);
    /// assert_eq!(runner.get_full_command(), "make -j");
    /// ```
    pub fn get_full_command(&self) -> String {
        if self.args.is_empty() {
            return self.command.clone();
        }
        format!("{} {}", &self.command, &self.args.join(" "))
    }

    /// Run the process and block until it terminates.
    ///
    /// There is no timeout: a process that never exits blocks the caller
    /// forever.
    pub fn run(&self) -> Result<RunOutput, ProcessError> {
        debug!("Running {}", self.get_full_command());
        let child =
            spawn_process(&self.command, &self.args, self.working_dir()).map_err(|source| {
                ProcessError::SpawnProcessFail {
                    command: self.get_full_command(),
                    source,
                }
            })?;

        let output = capture_output(child).map_err(|source| ProcessError::WaitChildFail {
            command: self.get_full_command(),
            source,
        })?;

        debug!("{} exited with {}", self.command, output.status);
        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status,
        })
    }
}
