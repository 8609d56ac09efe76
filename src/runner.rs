//! Bounded shell command execution.
//!
//! Commands are handed to `sh -c` as a single string. Shell metacharacters in the
//! command, including those that arrived through tool arguments, are interpreted by
//! the shell. This is the point of the `execute_command` tool and is not filtered.
//!
//! Every failure mode (launch error, timeout) is reported as text so the dispatcher
//! can return it as ordinary tool output.

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_TIMEOUT_SECS;

/// Errors raised while running a command.
///
/// The `Display` text of each variant is what the client sees.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The shell could not be started.
    #[error("{0}")]
    Spawn(#[source] std::io::Error),

    /// Waiting on the child or collecting its output failed.
    #[error("{0}")]
    Wait(#[source] std::io::Error),

    /// The command ran past the configured limit.
    ///
    /// The shell is killed; programs it started in the background or as part of
    /// a compound command are not.
    #[error("Command '{command}' timed out after {secs} seconds")]
    Timeout {
        /// The command line that was running.
        command: String,
        /// The limit that was exceeded, in seconds.
        secs: u64,
    },
}

/// Captured output of a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
}

impl CapturedOutput {
    /// Collapses the two streams into the single text returned to clients.
    ///
    /// Stdout wins when it has anything in it; otherwise stderr is returned, which
    /// may itself be empty.
    #[must_use]
    pub fn into_text(self) -> String {
        if self.stdout.is_empty() {
            self.stderr
        } else {
            self.stdout
        }
    }
}

/// Runs shell commands with a wall-clock limit.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    /// Creates a runner that stops waiting for commands after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Returns the execution limit.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs `command` and returns its output text, or the text of the failure.
    pub async fn run(&self, command: &str) -> String {
        match self.try_run(command).await {
            Ok(output) => output.into_text(),
            Err(e) => e.to_string(),
        }
    }

    /// Runs `command` through the shell and captures both streams.
    ///
    /// The exit status is not inspected.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be launched, waiting on it fails, or
    /// the command does not finish within the timeout.
    pub async fn try_run(&self, command: &str) -> Result<CapturedOutput, ExecError> {
        let exec_id = Uuid::new_v4();
        info!(%exec_id, command, "Executing command");

        let child = shell(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                warn!(%exec_id, error = %e, "Failed to launch command");
                ExecError::Spawn(e)
            })?;

        // Dropping the wait future on timeout drops the child, which kills the
        // shell only. Its own children are left running.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(ExecError::Wait)?,
            Err(_) => {
                warn!(%exec_id, timeout_secs = self.timeout.as_secs(), "Command timed out");
                return Err(ExecError::Timeout {
                    command: command.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        debug!(
            %exec_id,
            status = ?output.status,
            stdout_bytes = output.stdout.len(),
            stderr_bytes = output.stderr.len(),
            "Command finished"
        );

        Ok(CapturedOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
