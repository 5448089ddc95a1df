use crate::config::schema::ProjectConfig;
use crate::config::validate_project_config;
use crate::core::error::{AuditError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

pub const PROJECT_CONFIG_FILE: &str = "audit.toml";

pub struct ProjectConfigManager {
    config_path: PathBuf,
    required: bool,
}

impl ProjectConfigManager {
    /// Look for `audit.toml` in `project_dir`; a missing file means defaults.
    pub fn new(project_dir: &Path) -> Self {
        Self {
            config_path: project_dir.join(PROJECT_CONFIG_FILE),
            required: false,
        }
    }

    /// Use an explicitly named config file, which must exist.
    pub fn from_path(config_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            required: true,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub async fn load(&self) -> Result<ProjectConfig> {
        if !self.exists() {
            if self.required {
                return Err(AuditError::ConfigNotFound(
                    self.config_path.display().to_string(),
                ));
            }
            tracing::debug!(
                "No {} found, using built-in defaults",
                self.config_path.display()
            );
            return Ok(ProjectConfig::default());
        }

        tracing::debug!("Loading config from {}", self.config_path.display());
        let content = fs::read_to_string(&self.config_path).await?;
        let config: ProjectConfig = toml::from_str(&content)?;
        validate_project_config(&config)?;
        Ok(config)
    }
}
