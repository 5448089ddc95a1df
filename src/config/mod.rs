pub mod project;
pub mod schema;
pub mod validation;

pub use project::{ProjectConfigManager, PROJECT_CONFIG_FILE};
pub use schema::{AuditConfig, ProjectConfig, DEFAULT_AUDIT_SCRIPT, DEFAULT_AUDIT_TARGET};
pub use validation::validate_project_config;
