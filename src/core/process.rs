use crate::core::error::{AuditError, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::Command;

/// A fully resolved command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub current_dir: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit code and undecoded output streams of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Starts a process, waits for it to exit and captures both output streams.
#[allow(async_fn_in_trait)]
pub trait ProcessLauncher {
    async fn launch(&self, invocation: &Invocation) -> Result<RawOutput>;
}

/// Launcher backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    async fn launch(&self, invocation: &Invocation) -> Result<RawOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .output()
            .await
            .map_err(|e| {
                AuditError::LaunchFailure(format!(
                    "Failed to execute {}: {}",
                    invocation.program.display(),
                    e
                ))
            })?;

        Ok(RawOutput {
            exit_code: exit_code_from_status(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Exit code of a finished process. A unix process killed by a signal has no
/// code; it is reported as the negated signal number.
pub fn exit_code_from_status(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .unwrap_or_else(|| status.signal().map_or(-1, |s| -s))
    }
    #[cfg(not(unix))]
    {
        status.code().unwrap_or(1)
    }
}
