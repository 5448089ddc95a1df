pub mod commands;

use crate::core::DecodePolicy;
use clap::Parser;
use commands::audit::AuditOptions;
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum DecodeMode {
    Ignore,
    Replace,
}

impl From<DecodeMode> for DecodePolicy {
    fn from(value: DecodeMode) -> Self {
        match value {
            DecodeMode::Ignore => DecodePolicy::Ignore,
            DecodeMode::Replace => DecodePolicy::Replace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "audit-runner",
    version,
    about = "Run the project UX audit script and print its output and exit code",
    long_about = None
)]
pub struct Cli {
    /// Config file (default: audit.toml in the working directory, if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Python interpreter (default: from audit.toml, $VIRTUAL_ENV, or python3 on PATH)
    #[arg(short, long, value_name = "PATH")]
    pub interpreter: Option<PathBuf>,

    /// Audit script, relative to the working directory (default: from audit.toml)
    #[arg(short, long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Working directory for the audit (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// How to handle output that is not valid UTF-8 (default: from audit.toml, or ignore)
    #[arg(long, value_enum)]
    pub decode: Option<DecodeMode>,

    /// Arguments passed to the audit script (default: ".")
    #[arg(last = true)]
    pub args: Vec<String>,
}

/// Run the audit. Every outcome is reported on stdout; this never fails.
pub async fn run(cli: Cli) {
    let options = AuditOptions {
        config: cli.config,
        interpreter: cli.interpreter,
        script: cli.script,
        dir: cli.dir,
        decode: cli.decode.map(Into::into),
        args: cli.args,
    };

    commands::audit::execute(options).await;
}
