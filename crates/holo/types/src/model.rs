//! Holographic model (ownership record) types
//!
//! Metadata is fixed at mint time. Only the owner changes afterwards.

use crate::error::{RegistryError, Result};
use crate::ids::{Identity, ModelId, SimulationId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance score, validated to `0..=100` at creation and on deserialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct SignificanceScore(u8);

impl SignificanceScore {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 100;

    pub fn new(score: i64) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&score) {
            return Err(RegistryError::invalid_significance_score());
        }
        Ok(Self(score as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for SignificanceScore {
    type Error = RegistryError;

    fn try_from(score: i64) -> Result<Self> {
        Self::new(score)
    }
}

impl From<SignificanceScore> for u8 {
    fn from(score: SignificanceScore) -> Self {
        score.0
    }
}

impl fmt::Display for SignificanceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable metadata captured when a model is minted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub creator: Identity,
    pub name: String,
    pub description: String,
    /// Opaque content hash
    pub model_hash: String,
    /// Informational link to a simulation; never checked against the workflow registry
    pub simulation_id: SimulationId,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub significance_score: SignificanceScore,
}

/// A minted model with its current owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolographicModel {
    pub id: ModelId,
    pub metadata: ModelMetadata,
    pub owner: Identity,
}

impl HolographicModel {
    /// Whether the current owner is the original creator.
    pub fn is_held_by_creator(&self) -> bool {
        self.owner == self.metadata.creator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_bounds_inclusive() {
        assert_eq!(SignificanceScore::new(0).unwrap().value(), 0);
        assert_eq!(SignificanceScore::new(100).unwrap().value(), 100);
        assert_eq!(
            SignificanceScore::new(101),
            Err(RegistryError::invalid_significance_score())
        );
        assert_eq!(
            SignificanceScore::new(-1),
            Err(RegistryError::invalid_significance_score())
        );
    }

    #[test]
    fn test_score_deserialization_is_validated() {
        let score: SignificanceScore = serde_json::from_str("85").unwrap();
        assert_eq!(score.value(), 85);
        assert_eq!(serde_json::to_string(&score).unwrap(), "85");

        for input in ["200", "101", "-1"] {
            let err = serde_json::from_str::<SignificanceScore>(input).unwrap_err();
            assert!(err.to_string().contains("Invalid significance score"), "{input}");
        }
    }

    proptest! {
        #[test]
        fn valid_scores_are_kept_exactly(score in 0i64..=100) {
            prop_assert_eq!(SignificanceScore::new(score).unwrap().value() as i64, score);
        }

        #[test]
        fn out_of_range_scores_rejected(score in prop_oneof![i64::MIN..0i64, 101i64..=i64::MAX]) {
            prop_assert_eq!(
                SignificanceScore::new(score),
                Err(RegistryError::invalid_significance_score())
            );
        }
    }
}
