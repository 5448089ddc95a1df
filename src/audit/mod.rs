//! The audit runner: launches the UX audit script once and reports its
//! captured output and exit code.

pub mod report;
pub mod runner;

pub use report::{AuditReport, CapturedOutput, BANNER};
pub use runner::{run_audit, AuditRunner, AuditSettings};
