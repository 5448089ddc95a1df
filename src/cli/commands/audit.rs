use crate::audit::{run_audit, AuditSettings};
use crate::config::{AuditConfig, ProjectConfigManager};
use crate::core::error::{AuditError, Result};
use crate::core::{resolve_path, DecodePolicy, SystemLauncher};
use crate::python::resolve_interpreter;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Command-line overrides; `None` / empty means "use audit.toml or the default".
#[derive(Debug, Clone, Default)]
pub struct AuditOptions {
    pub config: Option<PathBuf>,
    pub interpreter: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub decode: Option<DecodePolicy>,
    pub args: Vec<String>,
}

/// Merge flags over the project config: flag > audit.toml > built-in default.
pub fn resolve_settings(
    options: AuditOptions,
    config: AuditConfig,
    working_dir: PathBuf,
    virtual_env: Option<&Path>,
) -> AuditSettings {
    let explicit_interpreter = options
        .interpreter
        .or_else(|| config.interpreter.map(PathBuf::from));
    let interpreter = resolve_interpreter(explicit_interpreter.as_deref(), virtual_env);
    tracing::debug!(
        "Using interpreter {} ({:?})",
        interpreter.path.display(),
        interpreter.source
    );

    let args = if options.args.is_empty() {
        config.args
    } else {
        options.args
    };

    AuditSettings {
        interpreter: interpreter.path,
        script: options
            .script
            .unwrap_or_else(|| PathBuf::from(config.script)),
        args,
        working_dir,
        decode: options.decode.unwrap_or(config.decode),
    }
}

/// Working directory, config and interpreter for this run. Errors here are
/// reported as a failed audit, after the banner.
async fn prepare(options: AuditOptions) -> Result<AuditSettings> {
    let current_dir = env::current_dir().map_err(|e| {
        AuditError::LaunchFailure(format!("Failed to read current directory: {}", e))
    })?;
    let working_dir = match &options.dir {
        Some(dir) => resolve_path(&current_dir, dir),
        None => current_dir.clone(),
    };

    let config_mgr = match &options.config {
        Some(path) => ProjectConfigManager::from_path(&resolve_path(&current_dir, path)),
        None => ProjectConfigManager::new(&working_dir),
    };
    let config = config_mgr.load().await?.audit;

    let virtual_env = env::var_os("VIRTUAL_ENV").map(PathBuf::from);
    Ok(resolve_settings(
        options,
        config,
        working_dir,
        virtual_env.as_deref(),
    ))
}

pub async fn execute(options: AuditOptions) {
    let mut stdout = io::stdout().lock();
    run_audit(&mut stdout, SystemLauncher, prepare(options)).await;
}
