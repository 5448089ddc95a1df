use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    /// The child process could not be started, waited on, or captured.
    /// Display is the bare message so callers can prefix it.
    #[error("{0}")]
    LaunchFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
