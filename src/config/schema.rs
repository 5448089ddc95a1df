use crate::core::DecodePolicy;
use serde::Deserialize;

pub const DEFAULT_AUDIT_SCRIPT: &str = ".agent/skills/frontend-design/scripts/ux_audit.py";
pub const DEFAULT_AUDIT_TARGET: &str = ".";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_script")]
    pub script: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default)]
    pub interpreter: Option<String>,
    #[serde(default)]
    pub decode: DecodePolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            args: default_args(),
            interpreter: None,
            decode: DecodePolicy::default(),
        }
    }
}

fn default_script() -> String {
    DEFAULT_AUDIT_SCRIPT.to_string()
}

fn default_args() -> Vec<String> {
    vec![DEFAULT_AUDIT_TARGET.to_string()]
}
