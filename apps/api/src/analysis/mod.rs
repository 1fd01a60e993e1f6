//! Analysis pipeline: scores stored resumes, optionally enriches them with an AI
//! verdict, persists the result and ranks batches.

pub mod export;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod reviewer;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::reviewer::AiVerdict;
use crate::analysis::store::StoreError;
use crate::llm_client::LlmError;
use crate::scoring::components::ComponentScoreSet;
use crate::scoring::ranking::RankCandidate;

/// One scoring run over one resume. A re-run creates a new record and supersedes this
/// one (`is_current`) without touching its scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub component_scores: ComponentScoreSet,
    pub ai_verdict: Option<AiVerdict>,
    pub final_score: f64,
    pub is_best: bool,
    pub is_current: bool,
    pub scoring_version: i32,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn rank_candidate(&self) -> RankCandidate {
        RankCandidate {
            analysis_id: self.id,
            resume_id: self.resume_id,
            component_scores: self.component_scores,
            ai: self.ai_verdict.as_ref().map(AiVerdict::scores),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("resume {0} not found")]
    ResumeNotFound(Uuid),

    #[error("AI reviewer unavailable: {0}")]
    CollaboratorUnavailable(#[from] LlmError),

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AnalysisError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AnalysisError::ResumeNotFound(id),
            other => AnalysisError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ResumeNotFound,
    CollaboratorUnavailable,
    Storage,
}

/// A resume that could not be analysed inside a batch. The rest of the batch proceeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub resume_id: Uuid,
    pub kind: FailureKind,
    pub message: String,
}

impl BatchFailure {
    pub fn new(resume_id: Uuid, error: &AnalysisError) -> Self {
        let kind = match error {
            AnalysisError::ResumeNotFound(_) => FailureKind::ResumeNotFound,
            AnalysisError::CollaboratorUnavailable(_) => FailureKind::CollaboratorUnavailable,
            AnalysisError::Store(_) => FailureKind::Storage,
        };
        Self {
            resume_id,
            kind,
            message: error.to_string(),
        }
    }
}
