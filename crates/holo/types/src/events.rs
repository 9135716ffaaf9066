//! Registry events
//!
//! One event is journaled per successful mutation. Rejected operations
//! leave no trace in the journal.

use crate::ids::{Identity, ModelId, SimulationId};
use crate::simulation::SimulationStatus;
use serde::{Deserialize, Serialize};

/// Event emitted by a registry after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    ModelMinted {
        model_id: ModelId,
        creator: Identity,
        significance_score: u8,
        timestamp: i64,
    },

    ModelTransferred {
        model_id: ModelId,
        from: Identity,
        to: Identity,
        timestamp: i64,
    },

    SimulationCreated {
        simulation_id: SimulationId,
        creator: Identity,
        timestamp: i64,
    },

    SimulationStatusChanged {
        simulation_id: SimulationId,
        updater: Identity,
        from: SimulationStatus,
        to: SimulationStatus,
        timestamp: i64,
    },

    ResourcesAllocated {
        simulation_id: SimulationId,
        allocator: Identity,
        resources: i64,
        timestamp: i64,
    },
}

impl RegistryEvent {
    pub fn timestamp(&self) -> i64 {
        match self {
            RegistryEvent::ModelMinted { timestamp, .. }
            | RegistryEvent::ModelTransferred { timestamp, .. }
            | RegistryEvent::SimulationCreated { timestamp, .. }
            | RegistryEvent::SimulationStatusChanged { timestamp, .. }
            | RegistryEvent::ResourcesAllocated { timestamp, .. } => *timestamp,
        }
    }

    /// Identity that performed the mutation
    pub fn actor(&self) -> &Identity {
        match self {
            RegistryEvent::ModelMinted { creator, .. } => creator,
            RegistryEvent::ModelTransferred { from, .. } => from,
            RegistryEvent::SimulationCreated { creator, .. } => creator,
            RegistryEvent::SimulationStatusChanged { updater, .. } => updater,
            RegistryEvent::ResourcesAllocated { allocator, .. } => allocator,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RegistryEvent::ModelMinted { .. } => "model_minted",
            RegistryEvent::ModelTransferred { .. } => "model_transferred",
            RegistryEvent::SimulationCreated { .. } => "simulation_created",
            RegistryEvent::SimulationStatusChanged { .. } => "simulation_status_changed",
            RegistryEvent::ResourcesAllocated { .. } => "resources_allocated",
        }
    }
}
