use audit_runner::cli::{run, Cli};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the audit report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI
    let cli = Cli::parse();

    // Run audit
    run(cli).await;
}
