use std::io::{self, Write};

pub const BANNER: &str = "Starting Audit...";

/// Decoded result of a completed audit process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Outcome of one audit run: the process completed (with any exit code) or it
/// could not be launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditReport {
    Completed(CapturedOutput),
    Failed(String),
}

impl AuditReport {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            AuditReport::Completed(output) => Some(output.exit_code),
            AuditReport::Failed(_) => None,
        }
    }

    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            AuditReport::Completed(output) => {
                writeln!(out, "STDOUT:")?;
                writeln!(out, "{}", output.stdout)?;
                writeln!(out, "STDERR:")?;
                writeln!(out, "{}", output.stderr)?;
                writeln!(out, "EXIT CODE: {}", output.exit_code)?;
            }
            AuditReport::Failed(message) => {
                writeln!(out, "FAILED: {}", message)?;
            }
        }
        out.flush()
    }
}

pub fn write_banner<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", BANNER)?;
    out.flush()
}
