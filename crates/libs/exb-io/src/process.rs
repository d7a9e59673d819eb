//! Low-level process management utilities.

use std::{
    ffi::OsStr,
    io,
    path::Path,
    process::{Child, Command, Output, Stdio},
};

/// Errors that can occur during process operations.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    /// Failed to spawn the process. Usually the program is not installed.
    #[error("Failed to spawn {command} - {source}")]
    SpawnProcessFail { command: String, source: io::Error },

    /// Failed to wait for the child process or to read its output.
    #[error("Failed to wait for {command} - {source}")]
    WaitChildFail { command: String, source: io::Error },
}

/// Spawn a new process with piped stdout and stderr.
///
/// The child inherits no stdin, so tools waiting for input see EOF instead of
/// blocking forever.
///
/// # Arguments
///
/// * `cmd` - Command to execute
/// * `args` - Command line arguments
/// * `current_dir` - Working directory of the child, or the current one
pub fn spawn_process(
    cmd: &str,
    args: &[String],
    current_dir: Option<&Path>,
) -> Result<Child, io::Error> {
    let mut command = Command::new(OsStr::new(cmd));
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = current_dir {
        command.current_dir(dir);
    }
    command.spawn()
}

/// Wait for the child to terminate and collect everything it wrote.
///
/// Both pipes are drained concurrently, so a child filling one of them
/// cannot deadlock against us.
pub fn capture_output(child: Child) -> Result<Output, io::Error> {
    child.wait_with_output()
}
