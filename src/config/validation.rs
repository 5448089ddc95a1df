use crate::config::schema::ProjectConfig;
use crate::core::error::{AuditError, Result};

pub fn validate_project_config(config: &ProjectConfig) -> Result<()> {
    let audit = &config.audit;

    if audit.script.trim().is_empty() {
        return Err(AuditError::Config(
            "audit.script must not be empty".to_string(),
        ));
    }

    if let Some(interpreter) = &audit.interpreter {
        if interpreter.trim().is_empty() {
            return Err(AuditError::Config(
                "audit.interpreter must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}
