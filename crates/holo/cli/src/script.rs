//! Scenario scripts
//!
//! A script is an ordered list of registry operations, each carrying the
//! identity of its caller. The runner replays them against fresh registries
//! and records the outcome of every step.

use crate::error::{CliError, CliResult};
use holo_registry::{
    Clock, CreateSimulationRequest, ErrorKind, HolographicModel, Identity, ManualClock,
    MintRequest, ModelId, OwnershipRegistry, RegistryConfig, RegistryError, Simulation,
    SimulationId, SystemClock, WorkflowRegistry,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

/// A scenario script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    /// Load a script, as YAML for `.yaml`/`.yml` files and JSON otherwise
    pub fn load(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Ok(serde_yaml::from_str(&contents)?)
        } else {
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

/// One registry operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Mint {
        caller: Identity,
        name: String,
        #[serde(default)]
        description: String,
        model_hash: String,
        #[serde(default)]
        simulation_id: u64,
        significance_score: i64,
    },

    Transfer {
        caller: Identity,
        model_id: u64,
        recipient: Identity,
    },

    Create {
        caller: Identity,
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        parameters: String,
    },

    UpdateStatus {
        caller: Identity,
        simulation_id: u64,
        status: String,
    },

    Allocate {
        caller: Identity,
        simulation_id: u64,
        resources: i64,
    },

    /// Move the manual clock forward
    AdvanceClock { millis: i64 },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Mint { .. } => "mint",
            Step::Transfer { .. } => "transfer",
            Step::Create { .. } => "create",
            Step::UpdateStatus { .. } => "update_status",
            Step::Allocate { .. } => "allocate",
            Step::AdvanceClock { .. } => "advance_clock",
        }
    }

    pub fn caller(&self) -> Option<&Identity> {
        match self {
            Step::Mint { caller, .. }
            | Step::Transfer { caller, .. }
            | Step::Create { caller, .. }
            | Step::UpdateStatus { caller, .. }
            | Step::Allocate { caller, .. } => Some(caller),
            Step::AdvanceClock { .. } => None,
        }
    }
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Ok { value: Value },
    Rejected { kind: ErrorKind, message: String },
}

impl Outcome {
    fn from_result(result: Result<Value, RegistryError>) -> Self {
        match result {
            Ok(value) => Outcome::Ok { value },
            Err(err) => Outcome::Rejected {
                kind: err.kind(),
                message: err.message().to_string(),
            },
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected { .. })
    }
}

/// Replays steps against a pair of fresh registries
pub struct ScenarioRunner {
    models: OwnershipRegistry,
    simulations: WorkflowRegistry,
    manual_clock: Option<Arc<ManualClock>>,
}

impl ScenarioRunner {
    /// Create a runner. With `manual_start`, timestamps come from a manual
    /// clock starting at that value; otherwise from the system clock.
    pub fn new(config: RegistryConfig, manual_start: Option<i64>) -> CliResult<Self> {
        let manual_clock = manual_start
            .map(ManualClock::new)
            .transpose()?
            .map(Arc::new);
        let clock: Arc<dyn Clock> = match &manual_clock {
            Some(clock) => clock.clone(),
            None => Arc::new(SystemClock),
        };

        Ok(Self {
            models: OwnershipRegistry::with_clock(clock.clone()),
            simulations: WorkflowRegistry::with_clock(config, clock),
            manual_clock,
        })
    }

    pub fn apply(&self, step: &Step) -> CliResult<Outcome> {
        let result = match step {
            Step::Mint {
                caller,
                name,
                description,
                model_hash,
                simulation_id,
                significance_score,
            } => {
                let request = MintRequest::new(
                    name.as_str(),
                    description.as_str(),
                    model_hash.as_str(),
                    *simulation_id,
                    *significance_score,
                );
                self.models
                    .mint(request, caller)
                    .map(|id| json!({ "model_id": id }))
            }
            Step::Transfer {
                caller,
                model_id,
                recipient,
            } => self
                .models
                .transfer(ModelId(*model_id), caller, recipient)
                .map(|()| json!(true)),
            Step::Create {
                caller,
                name,
                description,
                parameters,
            } => {
                let request = CreateSimulationRequest::new(
                    name.as_str(),
                    description.as_str(),
                    parameters.as_str(),
                );
                let id = self.simulations.create(request, caller);
                Ok(json!({ "simulation_id": id }))
            }
            Step::UpdateStatus {
                caller,
                simulation_id,
                status,
            } => self
                .simulations
                .update_status(SimulationId(*simulation_id), status, caller)
                .map(|()| json!(true)),
            Step::Allocate {
                caller,
                simulation_id,
                resources,
            } => self
                .simulations
                .allocate(SimulationId(*simulation_id), *resources, caller)
                .map(|()| json!(true)),
            Step::AdvanceClock { millis } => {
                let clock = self.manual_clock.as_ref().ok_or_else(|| {
                    CliError::InvalidScript("advance_clock requires --manual-clock".to_string())
                })?;
                let now = clock
                    .advance(*millis)
                    .map_err(|err| CliError::InvalidScript(format!("advance_clock: {err}")))?;
                Ok(json!({ "now": now }))
            }
        };

        Ok(Outcome::from_result(result))
    }

    pub fn models(&self) -> Vec<HolographicModel> {
        self.models.snapshot()
    }

    pub fn simulations(&self) -> Vec<Simulation> {
        self.simulations.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Script {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let script = parse(
            r#"{"steps": [
                {"op": "mint", "caller": "alice", "name": "M", "model_hash": "0xHASH", "simulation_id": 1, "significance_score": 85},
                {"op": "update_status", "caller": "alice", "simulation_id": 1, "status": "running"},
                {"op": "advance_clock", "millis": 10}
            ]}"#,
        );
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[0].name(), "mint");
        assert_eq!(script.steps[1].caller(), Some(&Identity::new("alice")));
        assert!(script.steps[2].caller().is_none());
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result: Result<Script, _> =
            serde_json::from_str(r#"{"steps": [{"op": "burn", "caller": "alice"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_runner_reports_rejections() {
        let runner = ScenarioRunner::new(RegistryConfig::default(), Some(100)).unwrap();
        let script = parse(
            r#"{"steps": [
                {"op": "create", "caller": "alice", "name": "S"},
                {"op": "allocate", "caller": "alice", "simulation_id": 1, "resources": 1000},
                {"op": "allocate", "caller": "CONTRACT_OWNER", "simulation_id": 1, "resources": 1000}
            ]}"#,
        );

        let outcomes: Vec<_> = script
            .steps
            .iter()
            .map(|step| runner.apply(step).unwrap())
            .collect();

        assert_eq!(
            outcomes[0],
            Outcome::Ok {
                value: json!({ "simulation_id": 1 })
            }
        );
        assert_eq!(
            outcomes[1],
            Outcome::Rejected {
                kind: ErrorKind::Authorization,
                message: "Not authorized".to_string()
            }
        );
        assert_eq!(outcomes[2], Outcome::Ok { value: json!(true) });
        assert_eq!(runner.simulations()[0].resource_allocation, 1000);
    }

    #[test]
    fn test_manual_clock_drives_timestamps() {
        let runner = ScenarioRunner::new(RegistryConfig::default(), Some(1_000)).unwrap();
        let script = parse(
            r#"{"steps": [
                {"op": "create", "caller": "alice", "name": "S"},
                {"op": "advance_clock", "millis": 500},
                {"op": "update_status", "caller": "alice", "simulation_id": 1, "status": "running"}
            ]}"#,
        );
        for step in &script.steps {
            runner.apply(step).unwrap();
        }
        assert_eq!(runner.simulations()[0].start_time, 1_500);
    }

    #[test]
    fn test_advance_clock_needs_manual_clock() {
        let runner = ScenarioRunner::new(RegistryConfig::default(), None).unwrap();
        let err = runner
            .apply(&Step::AdvanceClock { millis: 1 })
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidScript(_)));
    }

    #[test]
    fn test_manual_clock_must_start_positive() {
        for start in [0, -1] {
            let result = ScenarioRunner::new(RegistryConfig::default(), Some(start));
            assert!(matches!(result, Err(CliError::Clock(_))));
        }

        let runner = ScenarioRunner::new(RegistryConfig::default(), Some(1)).unwrap();
        let script = parse(
            r#"{"steps": [
                {"op": "create", "caller": "alice", "name": "S"},
                {"op": "update_status", "caller": "alice", "simulation_id": 1, "status": "running"}
            ]}"#,
        );
        for step in &script.steps {
            runner.apply(step).unwrap();
        }
        let sim = &runner.simulations()[0];
        assert_ne!(sim.start_time, 0);
        assert!(sim.has_started());
    }

    #[test]
    fn test_advance_clock_rejects_overflow_and_rewind() {
        let runner = ScenarioRunner::new(RegistryConfig::default(), Some(1_000)).unwrap();

        for millis in [i64::MAX, 0, -1_000] {
            let err = runner.apply(&Step::AdvanceClock { millis }).unwrap_err();
            assert!(matches!(err, CliError::InvalidScript(_)), "{millis}");
        }

        let outcome = runner.apply(&Step::AdvanceClock { millis: 5 }).unwrap();
        assert_eq!(outcome, Outcome::Ok { value: json!({ "now": 1_005 }) });
    }
}
