//! HOLO Types - Core types for the model and simulation registries
//!
//! HOLO keeps two independent registries that share one structural pattern:
//! monotonic id issuance, owner/creator based authorization, and field-level
//! validation before any mutation.
//!
//! ## Key Concepts
//!
//! - **HolographicModel**: A uniquely identified ownership record with
//!   immutable metadata and a transferable owner
//! - **Simulation**: A workflow record moving through the status vocabulary
//!   `pending | running | completed | failed`
//! - **Identity**: The opaque caller identity supplied by the host
//! - **RegistryError**: The validation / authorization / not-found taxonomy
//! - **RegistryEvent**: Journal entry emitted for each successful mutation

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod events;
pub mod ids;
pub mod model;
pub mod simulation;

// Re-export main types
pub use error::{ErrorKind, RegistryError, Result};
pub use events::RegistryEvent;
pub use ids::{Identity, ModelId, SimulationId};
pub use model::{HolographicModel, ModelMetadata, SignificanceScore};
pub use simulation::{Simulation, SimulationStatus};

/// Render a millisecond timestamp as RFC 3339, or `-` when unset.
pub fn format_timestamp(millis: i64) -> String {
    if millis == 0 {
        return "-".to_string();
    }
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_unset() {
        assert_eq!(format_timestamp(0), "-");
    }

    #[test]
    fn test_format_timestamp_rfc3339() {
        assert_eq!(format_timestamp(1_000), "1970-01-01T00:00:01+00:00");
    }
}
