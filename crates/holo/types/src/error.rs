//! Registry error taxonomy
//!
//! Every failure is terminal for the single operation that raised it and is
//! returned before any state is written. The messages are part of the
//! external contract and must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const INVALID_SIGNIFICANCE_SCORE: &str = "Invalid significance score";
pub const NOT_AUTHORIZED: &str = "Not authorized";
pub const INVALID_SIMULATION: &str = "Invalid simulation";
pub const INVALID_STATUS: &str = "Invalid status";

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Input violates a static domain constraint
    #[error("{0}")]
    Validation(&'static str),

    /// Caller identity lacks permission for the mutation
    #[error("{0}")]
    Authorization(&'static str),

    /// Referenced record does not exist
    #[error("{0}")]
    NotFound(&'static str),
}

impl RegistryError {
    pub fn invalid_significance_score() -> Self {
        Self::Validation(INVALID_SIGNIFICANCE_SCORE)
    }

    pub fn not_authorized() -> Self {
        Self::Authorization(NOT_AUTHORIZED)
    }

    pub fn invalid_simulation() -> Self {
        Self::NotFound(INVALID_SIMULATION)
    }

    pub fn invalid_status() -> Self {
        Self::Validation(INVALID_STATUS)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// The fixed message carried by this error.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Validation(msg) | Self::Authorization(msg) | Self::NotFound(msg) => msg,
        }
    }
}

/// Error kind, for callers that branch on the failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Authorization => write!(f, "authorization"),
            ErrorKind::NotFound => write!(f, "not_found"),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
