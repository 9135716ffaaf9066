//! Registry configuration

use holo_types::Identity;
use serde::{Deserialize, Serialize};

/// Identity granted elevated authority when none is configured
pub const DEFAULT_PRIVILEGED_IDENTITY: &str = "CONTRACT_OWNER";

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Identity allowed to update any simulation and to allocate resources
    #[serde(default = "default_privileged_identity")]
    pub privileged_identity: Identity,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            privileged_identity: default_privileged_identity(),
        }
    }
}

impl RegistryConfig {
    pub fn with_privileged_identity(identity: impl Into<Identity>) -> Self {
        Self {
            privileged_identity: identity.into(),
        }
    }
}

fn default_privileged_identity() -> Identity {
    Identity::new(DEFAULT_PRIVILEGED_IDENTITY)
}
