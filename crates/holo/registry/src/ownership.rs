//! Ownership registry for holographic models
//!
//! Models are minted with immutable metadata and an owner that starts out as
//! the creator. Only the current owner may transfer a model. Models are never
//! deleted.

use crate::clock::{Clock, SystemClock};
use holo_types::{
    HolographicModel, Identity, ModelId, ModelMetadata, RegistryError, RegistryEvent, Result,
    SignificanceScore, SimulationId,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Request to mint a new model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub name: String,
    pub description: String,
    pub model_hash: String,
    pub simulation_id: SimulationId,
    /// Must lie in `0..=100`
    pub significance_score: i64,
}

impl MintRequest {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        model_hash: impl Into<String>,
        simulation_id: u64,
        significance_score: i64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            model_hash: model_hash.into(),
            simulation_id: SimulationId(simulation_id),
            significance_score,
        }
    }
}

#[derive(Default)]
struct OwnershipState {
    last_model_id: u64,
    models: BTreeMap<ModelId, HolographicModel>,
    events: Vec<RegistryEvent>,
}

/// Registry of minted models and their owners
pub struct OwnershipRegistry {
    state: Mutex<OwnershipState>,
    clock: Arc<dyn Clock>,
}

impl OwnershipRegistry {
    /// Create an empty registry using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty registry with an explicit clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(OwnershipState::default()),
            clock,
        }
    }

    /// Mint a model owned by `creator`.
    ///
    /// The score is validated before an id is issued, so a rejected mint
    /// does not consume one.
    pub fn mint(&self, request: MintRequest, creator: &Identity) -> Result<ModelId> {
        let significance_score = SignificanceScore::new(request.significance_score)
            .inspect_err(|err| {
                debug!(
                    creator = %creator,
                    score = request.significance_score,
                    kind = %err.kind(),
                    "Mint rejected"
                );
            })?;

        let mut state = self.state.lock();
        let now = self.clock.now_millis();
        state.last_model_id += 1;
        let id = ModelId(state.last_model_id);

        let model = HolographicModel {
            id,
            metadata: ModelMetadata {
                creator: creator.clone(),
                name: request.name,
                description: request.description,
                model_hash: request.model_hash,
                simulation_id: request.simulation_id,
                created_at: now,
                significance_score,
            },
            owner: creator.clone(),
        };
        state.models.insert(id, model);
        state.events.push(RegistryEvent::ModelMinted {
            model_id: id,
            creator: creator.clone(),
            significance_score: significance_score.value(),
            timestamp: now,
        });

        info!(model_id = %id, creator = %creator, score = %significance_score, "Model minted");
        Ok(id)
    }

    /// Transfer a model from `sender` to `recipient`.
    ///
    /// A missing model and a sender who is not the current owner are both
    /// reported as `Not authorized`.
    pub fn transfer(&self, id: ModelId, sender: &Identity, recipient: &Identity) -> Result<()> {
        let mut state = self.state.lock();
        let now = self.clock.now_millis();

        let model = match state.models.get_mut(&id) {
            Some(model) if &model.owner == sender => model,
            _ => {
                debug!(model_id = %id, sender = %sender, "Transfer rejected");
                return Err(RegistryError::not_authorized());
            }
        };
        model.owner = recipient.clone();

        state.events.push(RegistryEvent::ModelTransferred {
            model_id: id,
            from: sender.clone(),
            to: recipient.clone(),
            timestamp: now,
        });

        info!(model_id = %id, from = %sender, to = %recipient, "Model transferred");
        Ok(())
    }

    /// Get a model by id
    pub fn model(&self, id: ModelId) -> Option<HolographicModel> {
        self.state.lock().models.get(&id).cloned()
    }

    /// Current owner of a model
    pub fn owner_of(&self, id: ModelId) -> Option<Identity> {
        self.state.lock().models.get(&id).map(|m| m.owner.clone())
    }

    /// All models currently owned by `owner`, ordered by id
    pub fn models_owned_by(&self, owner: &Identity) -> Vec<HolographicModel> {
        self.state
            .lock()
            .models
            .values()
            .filter(|m| &m.owner == owner)
            .cloned()
            .collect()
    }

    /// Last issued id, or `None` before the first mint
    pub fn last_model_id(&self) -> Option<ModelId> {
        match self.state.lock().last_model_id {
            0 => None,
            id => Some(ModelId(id)),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All models ordered by id
    pub fn snapshot(&self) -> Vec<HolographicModel> {
        self.state.lock().models.values().cloned().collect()
    }

    /// Journal of successful mutations, oldest first
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.lock().events.clone()
    }
}

impl Default for OwnershipRegistry {
    fn default() -> Self {
        Self::new()
    }
}
