use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("{name} weights must sum to 1.0, got {sum}")]
    BadSum { name: &'static str, sum: f64 },

    #[error("{name} weights must be finite and non-negative")]
    Negative { name: &'static str },
}

/// Per-component weights for the deterministic half of the composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub skill_match: f64,
    pub experience: f64,
    pub education: f64,
    pub format: f64,
    pub keyword_density: f64,
    pub timeline: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        let equal = 1.0 / 6.0;
        Self {
            skill_match: equal,
            experience: equal,
            education: equal,
            format: equal,
            keyword_density: equal,
            timeline: equal,
        }
    }
}

impl ComponentWeights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.skill_match,
            self.experience,
            self.education,
            self.format,
            self.keyword_density,
            self.timeline,
        ]
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        check("component", &self.as_array())
    }
}

/// Blend of the component sum with the AI-supplied ats score and match percentage.
/// Defaults: 0.5 components, 0.3 ats, 0.2 match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub components: f64,
    pub ats: f64,
    pub match_percentage: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            components: 0.5,
            ats: 0.3,
            match_percentage: 0.2,
        }
    }
}

impl CompositeWeights {
    pub fn validate(&self) -> Result<(), WeightError> {
        check("composite", &[self.components, self.ats, self.match_percentage])
    }

    /// Parses "components,ats,match", e.g. `0.5,0.3,0.2`.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match parts.as_slice() {
            [components, ats, match_percentage] => Some(Self {
                components: *components,
                ats: *ats,
                match_percentage: *match_percentage,
            }),
            _ => None,
        }
    }
}

fn check(name: &'static str, weights: &[f64]) -> Result<(), WeightError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(WeightError::Negative { name });
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(WeightError::BadSum { name, sum });
    }
    Ok(())
}
