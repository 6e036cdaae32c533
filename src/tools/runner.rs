use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

/// Outcome of an external program invocation that did not succeed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The executable could not be started at all
    #[error("{program}: executable not found")]
    NotFound { program: String },

    /// The executable ran but did not succeed
    #[error("{program} failed: {reason}")]
    Failed { program: String, reason: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait ProcessRunner {
    /// Run `program` with `args` inside `cwd`, blocking until it exits
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), RunError>;
}

/// Runs programs with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<(), RunError> {
        // A missing cwd also surfaces as NotFound from spawn
        if !cwd.is_dir() {
            return Err(RunError::Failed {
                program: program.to_string(),
                reason: format!("working directory {} does not exist", cwd.display()),
            });
        }

        debug!(program, ?args, cwd = %cwd.display(), "running");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => RunError::NotFound {
                    program: program.to_string(),
                },
                _ => RunError::Failed {
                    program: program.to_string(),
                    reason: e.to_string(),
                },
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty());
        let reason = match last_line {
            Some(line) => format!("{} ({})", output.status, line.trim()),
            None => output.status.to_string(),
        };

        Err(RunError::Failed {
            program: program.to_string(),
            reason,
        })
    }
}
