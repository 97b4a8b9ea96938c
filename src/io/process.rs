//! Helper process execution
//!
//! Runs short-lived helper programs to completion and captures their output.
//! Protocol decoding is left to the caller.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::{debug, info, trace};

// ============================================================================
// Process Errors
// ============================================================================

/// Error types for helper process execution
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}{}", format_stderr(.stderr))]
    ExitStatus {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} produced output that is not valid UTF-8")]
    InvalidUtf8 { program: String },
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

// ============================================================================
// Helper Command
// ============================================================================

/// An `<interpreter> <script>` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    /// Interpreter executable, resolved through `PATH`
    pub interpreter: String,

    /// Script handed to the interpreter as its only argument
    pub script: PathBuf,

    /// Working directory for the process (optional)
    pub working_directory: Option<PathBuf>,
}

impl HelperCommand {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            working_directory: None,
        }
    }

    pub fn with_working_directory(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }
}

// ============================================================================
// Helper Runner
// ============================================================================

/// Trait for running a helper process to completion
#[async_trait]
pub trait HelperRunner: Send + Sync {
    /// Run the command and return its standard output
    ///
    /// No timeout is applied: a helper that never exits keeps the returned
    /// future pending.
    async fn run(&self, command: &HelperCommand) -> Result<String, ProcessError>;
}

/// Runs helpers as child processes via tokio
#[derive(Debug, Default, Clone)]
pub struct ChildHelperRunner;

impl ChildHelperRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HelperRunner for ChildHelperRunner {
    async fn run(&self, command: &HelperCommand) -> Result<String, ProcessError> {
        info!(
            "Starting helper: {} {}",
            command.interpreter,
            command.script.display()
        );

        let mut command_builder = Command::new(&command.interpreter);
        command_builder
            .arg(&command.script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        if let Some(working_dir) = &command.working_directory {
            command_builder.current_dir(working_dir);
        }

        let output = command_builder
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: command.interpreter.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.trim().is_empty() {
            trace!("Helper stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            return Err(ProcessError::ExitStatus {
                program: command.interpreter.clone(),
                status: output.status,
                stderr,
            });
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| ProcessError::InvalidUtf8 {
                program: command.interpreter.clone(),
            })?;

        debug!("Helper finished, {} bytes of output", stdout.len());
        Ok(stdout)
    }
}

// ============================================================================
// Mock Helper Runner
// ============================================================================

/// Mock runner returning canned output
#[cfg(test)]
pub struct MockHelperRunner {
    outcome: Result<String, String>,
    invocations: std::sync::Mutex<Vec<HelperCommand>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockHelperRunner {
    /// Runner whose helper prints `stdout` and exits successfully
    pub fn with_output(stdout: &str) -> Self {
        Self {
            outcome: Ok(stdout.to_string()),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Runner whose helper cannot be spawned
    pub fn failing(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            invocations: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn invocations(&self) -> Vec<HelperCommand> {
        self.invocations.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl HelperRunner for MockHelperRunner {
    async fn run(&self, command: &HelperCommand) -> Result<String, ProcessError> {
        self.invocations.lock().unwrap().push(command.clone());
        match &self.outcome {
            Ok(stdout) => Ok(stdout.clone()),
            Err(reason) => Err(ProcessError::Spawn {
                program: command.interpreter.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, reason.clone()),
            }),
        }
    }
}
