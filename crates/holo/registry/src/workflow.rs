//! Workflow registry for simulations
//!
//! Simulations start `pending` and may be moved to any status by their
//! creator or by the privileged identity. No transition is refused on
//! ordering grounds; `completed -> pending` is as legal as `pending -> running`.
//! Resource allocation is reserved for the privileged identity alone.

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use holo_types::{
    Identity, RegistryError, RegistryEvent, Result, Simulation, SimulationId, SimulationStatus,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Request to create a new simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSimulationRequest {
    pub name: String,
    pub description: String,
    pub parameters: String,
}

impl CreateSimulationRequest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: parameters.into(),
        }
    }
}

#[derive(Default)]
struct WorkflowState {
    last_simulation_id: u64,
    simulations: BTreeMap<SimulationId, Simulation>,
    events: Vec<RegistryEvent>,
}

/// Registry of simulations and their lifecycle
pub struct WorkflowRegistry {
    state: Mutex<WorkflowState>,
    privileged_identity: Identity,
    clock: Arc<dyn Clock>,
}

impl WorkflowRegistry {
    /// Create an empty registry using the system clock
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an empty registry with an explicit clock
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(WorkflowState::default()),
            privileged_identity: config.privileged_identity,
            clock,
        }
    }

    pub fn privileged_identity(&self) -> &Identity {
        &self.privileged_identity
    }

    /// Create a `pending` simulation. Always succeeds.
    pub fn create(&self, request: CreateSimulationRequest, creator: &Identity) -> SimulationId {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();
        state.last_simulation_id += 1;
        let id = SimulationId(state.last_simulation_id);

        state.simulations.insert(
            id,
            Simulation::new(
                id,
                creator.clone(),
                request.name,
                request.description,
                request.parameters,
            ),
        );
        state.events.push(RegistryEvent::SimulationCreated {
            simulation_id: id,
            creator: creator.clone(),
            timestamp: now,
        });

        info!(simulation_id = %id, creator = %creator, "Simulation created");
        id
    }

    /// Set the status of a simulation.
    ///
    /// Checks run in a fixed order: the simulation must exist, then
    /// `updater` must be its creator or the privileged identity, then
    /// `new_status` must be in the vocabulary. Entering `running` stamps
    /// `start_time` every time; entering `completed` or `failed` stamps
    /// `end_time`.
    pub fn update_status(
        &self,
        id: SimulationId,
        new_status: &str,
        updater: &Identity,
    ) -> Result<()> {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();

        let simulation = state
            .simulations
            .get_mut(&id)
            .ok_or_else(RegistryError::invalid_simulation)
            .inspect_err(|_| debug!(simulation_id = %id, "Status update on unknown simulation"))?;

        if &simulation.creator != updater && updater != &self.privileged_identity {
            debug!(simulation_id = %id, updater = %updater, "Status update rejected");
            return Err(RegistryError::not_authorized());
        }

        let status: SimulationStatus = new_status.parse().inspect_err(|_| {
            debug!(simulation_id = %id, status = new_status, "Unknown status");
        })?;

        let previous = simulation.status;
        simulation.status = status;
        match status {
            SimulationStatus::Running => simulation.start_time = now,
            SimulationStatus::Completed | SimulationStatus::Failed => simulation.end_time = now,
            SimulationStatus::Pending => {}
        }

        state.events.push(RegistryEvent::SimulationStatusChanged {
            simulation_id: id,
            updater: updater.clone(),
            from: previous,
            to: status,
            timestamp: now,
        });

        info!(
            simulation_id = %id,
            updater = %updater,
            from = %previous,
            to = %status,
            "Simulation status updated"
        );
        Ok(())
    }

    /// Set the resource allocation of a simulation.
    ///
    /// Only the privileged identity may allocate; the creator may not.
    /// Any integer is accepted.
    pub fn allocate(&self, id: SimulationId, resources: i64, allocator: &Identity) -> Result<()> {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();

        let simulation = state
            .simulations
            .get_mut(&id)
            .ok_or_else(RegistryError::invalid_simulation)
            .inspect_err(|_| debug!(simulation_id = %id, "Allocation on unknown simulation"))?;

        if allocator != &self.privileged_identity {
            debug!(simulation_id = %id, allocator = %allocator, "Allocation rejected");
            return Err(RegistryError::not_authorized());
        }

        simulation.resource_allocation = resources;
        state.events.push(RegistryEvent::ResourcesAllocated {
            simulation_id: id,
            allocator: allocator.clone(),
            resources,
            timestamp: now,
        });

        info!(simulation_id = %id, resources, "Resources allocated");
        Ok(())
    }

    /// Get a simulation by id
    pub fn simulation(&self, id: SimulationId) -> Option<Simulation> {
        self.state.lock().simulations.get(&id).cloned()
    }

    /// Simulations currently in `status`, ordered by id
    pub fn simulations_by_status(&self, status: SimulationStatus) -> Vec<Simulation> {
        self.state
            .lock()
            .simulations
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect()
    }

    /// Simulations created by `creator`, ordered by id
    pub fn simulations_created_by(&self, creator: &Identity) -> Vec<Simulation> {
        self.state
            .lock()
            .simulations
            .values()
            .filter(|s| &s.creator == creator)
            .cloned()
            .collect()
    }

    /// Last issued id, or `None` before the first create
    pub fn last_simulation_id(&self) -> Option<SimulationId> {
        match self.state.lock().last_simulation_id {
            0 => None,
            id => Some(SimulationId(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All simulations ordered by id
    pub fn snapshot(&self) -> Vec<Simulation> {
        self.state.lock().simulations.values().cloned().collect()
    }

    /// Journal of successful mutations, oldest first
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.lock().events.clone()
    }
}

impl Default for WorkflowRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use holo_types::ErrorKind;
    use proptest::prelude::*;

    const ADMIN: &str = "CONTRACT_OWNER";

    fn registry_with_clock() -> (WorkflowRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000).unwrap());
        let registry = WorkflowRegistry::with_clock(
            RegistryConfig::with_privileged_identity(ADMIN),
            clock.clone(),
        );
        (registry, clock)
    }

    fn request() -> CreateSimulationRequest {
        CreateSimulationRequest::new(
            "Holographic Universe Model A",
            "Initial test of holographic principle",
            r#"{"dimensions": 11, "coupling_constant": 0.1}"#,
        )
    }

    #[test]
    fn test_create_defaults() {
        let (registry, _) = registry_with_clock();
        let id = registry.create(request(), &Identity::new("scientist1"));
        assert_eq!(id, SimulationId(1));

        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.name, "Holographic Universe Model A");
        assert_eq!(sim.status, SimulationStatus::Pending);
        assert_eq!(sim.resource_allocation, 0);
        assert_eq!(sim.start_time, 0);
        assert_eq!(sim.end_time, 0);
    }

    #[test]
    fn test_running_then_completed_timestamps() {
        let (registry, clock) = registry_with_clock();
        let alice = Identity::new("alice");
        let id = registry.create(request(), &alice);

        registry.update_status(id, "running", &alice).unwrap();
        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.status, SimulationStatus::Running);
        assert_eq!(sim.start_time, 1_000);
        assert_eq!(sim.end_time, 0);

        clock.advance(500).unwrap();
        registry.update_status(id, "completed", &alice).unwrap();
        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.status, SimulationStatus::Completed);
        assert_eq!(sim.start_time, 1_000);
        assert_eq!(sim.end_time, 1_500);
    }

    #[test]
    fn test_rerunning_resets_start_time() {
        let (registry, clock) = registry_with_clock();
        let alice = Identity::new("alice");
        let id = registry.create(request(), &alice);

        registry.update_status(id, "running", &alice).unwrap();
        clock.advance(10).unwrap();
        registry.update_status(id, "failed", &alice).unwrap();
        clock.advance(10).unwrap();
        registry.update_status(id, "running", &alice).unwrap();

        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.start_time, 1_020);
        assert_eq!(sim.end_time, 1_010);
    }

    #[test]
    fn test_backward_transition_allowed() {
        let (registry, _) = registry_with_clock();
        let alice = Identity::new("alice");
        let id = registry.create(request(), &alice);

        registry.update_status(id, "completed", &alice).unwrap();
        registry.update_status(id, "pending", &alice).unwrap();

        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.status, SimulationStatus::Pending);
        assert_ne!(sim.end_time, 0);
    }

    #[test]
    fn test_privileged_identity_may_update() {
        let (registry, _) = registry_with_clock();
        let id = registry.create(request(), &Identity::new("alice"));
        registry
            .update_status(id, "failed", &Identity::new(ADMIN))
            .unwrap();
        assert_eq!(
            registry.simulation(id).unwrap().status,
            SimulationStatus::Failed
        );
    }

    #[test]
    fn test_update_check_order() {
        let (registry, _) = registry_with_clock();
        let alice = Identity::new("alice");
        let mallory = Identity::new("mallory");

        let err = registry
            .update_status(SimulationId(42), "bogus", &alice)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Invalid simulation");

        let id = registry.create(request(), &alice);
        let err = registry.update_status(id, "bogus", &mallory).unwrap_err();
        assert_eq!(err, RegistryError::not_authorized());

        let err = registry.update_status(id, "invalid_status", &alice).unwrap_err();
        assert_eq!(err, RegistryError::invalid_status());

        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.status, SimulationStatus::Pending);
        assert_eq!(registry.events().len(), 1);
    }

    #[test]
    fn test_allocate_requires_privileged_identity() {
        let (registry, _) = registry_with_clock();
        let alice = Identity::new("alice");
        let id = registry.create(request(), &alice);

        assert_eq!(
            registry.allocate(id, 1000, &alice),
            Err(RegistryError::not_authorized())
        );
        assert_eq!(registry.simulation(id).unwrap().resource_allocation, 0);

        registry.allocate(id, 1000, &Identity::new(ADMIN)).unwrap();
        assert_eq!(registry.simulation(id).unwrap().resource_allocation, 1000);

        registry.allocate(id, -5, &Identity::new(ADMIN)).unwrap();
        assert_eq!(registry.simulation(id).unwrap().resource_allocation, -5);
    }

    #[test]
    fn test_allocate_unknown_simulation() {
        let (registry, _) = registry_with_clock();
        assert_eq!(
            registry.allocate(SimulationId(1), 10, &Identity::new("alice")),
            Err(RegistryError::invalid_simulation())
        );
    }

    #[test]
    fn test_configured_privileged_identity() {
        let registry = WorkflowRegistry::with_clock(
            RegistryConfig::with_privileged_identity("operator"),
            Arc::new(ManualClock::default()),
        );
        let id = registry.create(request(), &Identity::new("alice"));

        assert!(registry.allocate(id, 1, &Identity::new(ADMIN)).is_err());
        registry.allocate(id, 1, &Identity::new("operator")).unwrap();
        assert_eq!(registry.privileged_identity(), &Identity::new("operator"));
    }

    #[test]
    fn test_running_at_earliest_manual_time_is_started() {
        let registry = WorkflowRegistry::with_clock(
            RegistryConfig::default(),
            Arc::new(ManualClock::default()),
        );
        let alice = Identity::new("alice");
        let id = registry.create(request(), &alice);

        registry.update_status(id, "running", &alice).unwrap();
        let sim = registry.simulation(id).unwrap();
        assert_eq!(sim.start_time, 1);
        assert!(sim.has_started());
    }

    #[test]
    fn test_queries() {
        let (registry, _) = registry_with_clock();
        let alice = Identity::new("alice");
        let bob = Identity::new("bob");

        let a = registry.create(request(), &alice);
        let b = registry.create(request(), &bob);
        registry.update_status(b, "running", &bob).unwrap();

        let pending: Vec<_> = registry
            .simulations_by_status(SimulationStatus::Pending)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(pending, vec![a]);
        assert_eq!(registry.simulations_created_by(&bob)[0].id, b);
        assert_eq!(registry.last_simulation_id(), Some(b));
        assert_eq!(registry.snapshot().len(), 2);
    }

    proptest! {
        #[test]
        fn unknown_ids_always_not_found(
            id in 2u64..1_000,
            status in "[a-z]{0,10}",
            updater in "[a-zA-Z_]{1,16}",
        ) {
            let (registry, _) = registry_with_clock();
            registry.create(request(), &Identity::new("alice"));
            let result = registry.update_status(SimulationId(id), &status, &Identity::new(updater));
            prop_assert_eq!(result, Err(RegistryError::invalid_simulation()));
        }

        #[test]
        fn outsiders_never_update(status_idx in 0usize..4, outsider in "[a-z]{1,12}") {
            prop_assume!(outsider != "alice");
            let (registry, _) = registry_with_clock();
            let id = registry.create(request(), &Identity::new("alice"));
            let status = SimulationStatus::ALL[status_idx].as_str();
            let result = registry.update_status(id, status, &Identity::new(outsider));
            prop_assert_eq!(result, Err(RegistryError::not_authorized()));
        }
    }
}
