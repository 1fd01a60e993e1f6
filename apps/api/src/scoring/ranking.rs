//! Composite ranker: blends component scores with the AI verdict and picks one best
//! resume per batch.
//!
//! `rank_batch` is pure. Persisting the winner is a separate, single step performed by
//! the caller (see `analysis::store::AnalysisStore::promote_best`).

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::components::ComponentScoreSet;
use crate::scoring::normalize::bounded;
use crate::scoring::weights::{ComponentWeights, CompositeWeights};

/// Scores compare equal when they agree to this many decimal places' worth.
const SCORE_RESOLUTION: f64 = 1e6;

/// The two numbers the ranker needs from the AI verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiScores {
    pub ats_score: f64,
    pub match_percentage: f64,
}

/// One analysis as seen by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct RankCandidate {
    pub analysis_id: Uuid,
    pub resume_id: Uuid,
    pub component_scores: ComponentScoreSet,
    pub ai: Option<AiScores>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub analysis_id: Uuid,
    pub resume_id: Uuid,
    pub final_score: f64,
    pub ats_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub is_best: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub batch_id: Uuid,
    /// Sorted best-first; exactly one entry has `is_best` when non-empty.
    pub entries: Vec<RankedEntry>,
}

impl RankingResult {
    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }
}

/// `weighted_sum(components) * w_components + ats * w_ats + match * w_match`.
///
/// Without an AI verdict the whole score comes from the components.
pub fn final_score(
    scores: &ComponentScoreSet,
    ai: Option<&AiScores>,
    component_weights: &ComponentWeights,
    weights: &CompositeWeights,
) -> f64 {
    let component_part = scores.weighted_sum(component_weights);
    match ai {
        Some(ai) => bounded(
            component_part * weights.components
                + bounded(ai.ats_score) * weights.ats
                + bounded(ai.match_percentage) * weights.match_percentage,
        ),
        None => component_part,
    }
}

fn score_key(score: f64) -> i64 {
    (score * SCORE_RESOLUTION).round() as i64
}

/// Best-first ordering:
/// final score desc, ats desc (missing last), created_at asc, resume id asc.
fn compare(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    score_key(b.final_score)
        .cmp(&score_key(a.final_score))
        .then_with(|| {
            let a_ats = a.ats_score.map(score_key);
            let b_ats = b.ats_score.map(score_key);
            // Option orders None < Some, so reversing puts missing verdicts last.
            b_ats.cmp(&a_ats)
        })
        .then_with(|| a.created_at.cmp(&b.created_at))
        // Uuid byte order equals the order of its lowercase hyphenated form.
        .then_with(|| a.resume_id.cmp(&b.resume_id))
}

/// Ranks one batch and marks exactly one winner. Deterministic for identical input,
/// regardless of candidate order.
pub fn rank_batch(
    batch_id: Uuid,
    candidates: &[RankCandidate],
    component_weights: &ComponentWeights,
    weights: &CompositeWeights,
) -> RankingResult {
    let mut entries: Vec<RankedEntry> = candidates
        .iter()
        .map(|c| RankedEntry {
            rank: 0,
            analysis_id: c.analysis_id,
            resume_id: c.resume_id,
            final_score: final_score(
                &c.component_scores,
                c.ai.as_ref(),
                component_weights,
                weights,
            ),
            ats_score: c.ai.map(|ai| ai.ats_score),
            created_at: c.created_at,
            is_best: false,
        })
        .collect();

    entries.sort_by(compare);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
        entry.is_best = i == 0;
    }

    RankingResult { batch_id, entries }
}
