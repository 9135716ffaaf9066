//! CLI error types

use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Clock error: {0}")]
    Clock(#[from] holo_registry::ClockError),

    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// A step was rejected while running in strict mode
    #[error("Step {step} ({op}) rejected: {message}")]
    Rejected {
        step: usize,
        op: &'static str,
        message: String,
    },
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
