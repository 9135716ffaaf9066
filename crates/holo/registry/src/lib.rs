//! HOLO Registry - Access-controlled record registries
//!
//! This crate provides the two registries of the HOLO core:
//!
//! - **OwnershipRegistry**: Mints holographic models with immutable metadata
//!   and enforces owner-only transfer
//! - **WorkflowRegistry**: Creates simulations and moves them through the
//!   status vocabulary, with privileged resource allocation
//!
//! Both registries are plain values owning their own counter, record map, and
//! event journal. Construct one per deployment and share it by reference or
//! `Arc`; every operation is synchronous and runs under a single lock.
//!
//! Caller identities and time are supplied from outside: identities as opaque
//! strings, time through the [`Clock`] trait.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod clock;
pub mod config;
pub mod ownership;
pub mod workflow;

// Re-exports
pub use clock::{Clock, ClockError, ManualClock, SystemClock};
pub use config::{RegistryConfig, DEFAULT_PRIVILEGED_IDENTITY};
pub use holo_types::{
    ErrorKind, HolographicModel, Identity, ModelId, ModelMetadata, RegistryError, RegistryEvent,
    Result, SignificanceScore, Simulation, SimulationId, SimulationStatus,
};
pub use ownership::{MintRequest, OwnershipRegistry};
pub use workflow::{CreateSimulationRequest, WorkflowRegistry};
