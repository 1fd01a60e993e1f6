//! Component scoring engine.
//!
//! Leaf-first: `normalize` feeds the six scorers in `components`; `duplicates` runs on
//! upload; `ranking` combines component scores with the AI verdict per batch.

pub mod components;
pub mod duplicates;
pub mod features;
pub mod normalize;
pub mod ontology;
pub mod ranking;
pub mod weights;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::duplicates::DEFAULT_DUPLICATE_THRESHOLD;
use crate::scoring::ontology::SkillOntology;
use crate::scoring::weights::{ComponentWeights, CompositeWeights, WeightError};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Weights(#[from] WeightError),

    #[error("duplicate threshold must be within [0, 1], got {0}")]
    Threshold(f32),
}

/// Everything the scorers and the ranker read. Shared as an immutable snapshot; replacing
/// the ontology produces a new snapshot rather than mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub ontology: SkillOntology,
    pub component_weights: ComponentWeights,
    pub composite_weights: CompositeWeights,
    pub duplicate_threshold: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ontology: SkillOntology::default(),
            component_weights: ComponentWeights::default(),
            composite_weights: CompositeWeights::default(),
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

impl ScoringConfig {
    /// Stamped onto every analysis so scores from different vocabularies can be told apart.
    pub fn version(&self) -> i32 {
        i32::try_from(self.ontology.version).unwrap_or(i32::MAX)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.component_weights.validate()?;
        self.composite_weights.validate()?;
        if !(0.0..=1.0).contains(&self.duplicate_threshold) {
            return Err(ConfigError::Threshold(self.duplicate_threshold));
        }
        Ok(())
    }

    /// New snapshot using `ontology`, versioned after the current one.
    pub fn with_ontology(&self, ontology: SkillOntology) -> ScoringConfig {
        ScoringConfig {
            ontology: self.ontology.succeeded_by(ontology),
            ..self.clone()
        }
    }
}
