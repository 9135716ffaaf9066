//! Simulation (workflow record) types
//!
//! Status changes are deliberately unconstrained: any authorized caller may
//! move a simulation to any status, including backwards (`completed` ->
//! `pending`). Only the vocabulary itself is enforced.

use crate::error::RegistryError;
use crate::ids::{Identity, SimulationId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Simulation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Initial status of every simulation
    Pending,
    Running,
    Completed,
    Failed,
}

impl SimulationStatus {
    pub const ALL: [SimulationStatus; 4] = [
        SimulationStatus::Pending,
        SimulationStatus::Running,
        SimulationStatus::Completed,
        SimulationStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Pending => "pending",
            SimulationStatus::Running => "running",
            SimulationStatus::Completed => "completed",
            SimulationStatus::Failed => "failed",
        }
    }

    /// Completed or failed. Informational only; the registry never refuses
    /// a transition out of these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimulationStatus::Completed | SimulationStatus::Failed)
    }
}

impl fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimulationStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SimulationStatus::Pending),
            "running" => Ok(SimulationStatus::Running),
            "completed" => Ok(SimulationStatus::Completed),
            "failed" => Ok(SimulationStatus::Failed),
            _ => Err(RegistryError::invalid_status()),
        }
    }
}

/// A simulation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: SimulationId,
    pub creator: Identity,
    pub name: String,
    pub description: String,
    /// Opaque parameters, typically serialized configuration
    pub parameters: String,
    pub status: SimulationStatus,
    /// Set only by the privileged identity; any integer is accepted
    pub resource_allocation: i64,
    /// Milliseconds since the Unix epoch; 0 until the simulation first runs
    pub start_time: i64,
    /// Milliseconds since the Unix epoch; 0 until completed or failed
    pub end_time: i64,
}

impl Simulation {
    pub fn new(
        id: SimulationId,
        creator: Identity,
        name: String,
        description: String,
        parameters: String,
    ) -> Self {
        Self {
            id,
            creator,
            name,
            description,
            parameters,
            status: SimulationStatus::Pending,
            resource_allocation: 0,
            start_time: 0,
            end_time: 0,
        }
    }

    pub fn has_started(&self) -> bool {
        self.start_time != 0
    }

    pub fn has_ended(&self) -> bool {
        self.end_time != 0
    }
}
