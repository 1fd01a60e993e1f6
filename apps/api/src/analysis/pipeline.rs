//! Single and bulk analysis.
//!
//! Bulk runs score every resume independently with bounded concurrency, persist each
//! analysis as it completes and promote one best analysis once the whole batch resolved.
//! Dropping the bulk future before that point never promotes anything.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::reviewer::AiReviewer;
use crate::analysis::store::{AnalysisStore, StoreError};
use crate::analysis::{Analysis, AnalysisError, BatchFailure};
use crate::models::resume::StoredResume;
use crate::scoring::components::score_components;
use crate::scoring::features::JobProfile;
use crate::scoring::ranking::{final_score, rank_batch, RankingResult};
use crate::scoring::ScoringConfig;

/// Pause before the single retry of a conflicted promotion.
const PROMOTION_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Collaborators shared by single and bulk analysis.
#[derive(Clone, Copy)]
pub struct Analyzer<'a> {
    pub store: &'a dyn AnalysisStore,
    pub reviewer: Option<&'a dyn AiReviewer>,
    pub config: &'a ScoringConfig,
}

impl<'a> Analyzer<'a> {
    /// Scores one stored resume and saves the result as its current analysis.
    pub async fn analyze_resume(
        &self,
        resume_id: Uuid,
        profile: Option<&JobProfile>,
        batch_id: Option<Uuid>,
    ) -> Result<Analysis, AnalysisError> {
        let resume: StoredResume = self.store.get_resume(resume_id).await?.into();
        if resume.features.is_degenerate() {
            warn!(%resume_id, "resume has no usable features; scores fall back to defaults");
        }

        let component_scores = score_components(&resume.features, profile, self.config);

        let ai_verdict = match self.reviewer {
            Some(reviewer) => Some(reviewer.review(&resume.features, profile).await?),
            None => None,
        };

        let final_score = final_score(
            &component_scores,
            ai_verdict.as_ref().map(|v| v.scores()).as_ref(),
            &self.config.component_weights,
            &self.config.composite_weights,
        );

        let analysis = Analysis {
            id: Uuid::new_v4(),
            resume_id,
            batch_id,
            component_scores,
            ai_verdict,
            final_score,
            is_best: false,
            is_current: true,
            scoring_version: self.config.version(),
            created_at: Utc::now(),
        };
        self.store.save_analysis(&analysis).await?;

        info!(
            %resume_id,
            analysis_id = %analysis.id,
            final_score = analysis.final_score,
            "resume analysed"
        );
        Ok(analysis)
    }

    /// Analyses every resume of a batch, ranks the successes and promotes the winner.
    pub async fn run_bulk(&self, request: BulkRequest, concurrency: usize) -> BulkOutcome {
        let batch_id = request.batch_id;
        let profile = request.job_profile.as_ref();

        let mut seen = HashSet::new();
        let resume_ids: Vec<Uuid> = request
            .resume_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        info!(%batch_id, resumes = resume_ids.len(), concurrency, "bulk analysis started");

        let results: Vec<(Uuid, Result<Analysis, AnalysisError>)> = stream::iter(resume_ids)
            .map(|resume_id| async move {
                (
                    resume_id,
                    self.analyze_resume(resume_id, profile, Some(batch_id)).await,
                )
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut analyses = Vec::new();
        let mut failures = Vec::new();
        for (resume_id, result) in results {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => {
                    warn!(%batch_id, %resume_id, error = %e, "resume failed in batch");
                    failures.push(BatchFailure::new(resume_id, &e));
                }
            }
        }
        failures.sort_by_key(|f| f.resume_id);

        let candidates: Vec<_> = analyses.iter().map(Analysis::rank_candidate).collect();
        let ranking = rank_batch(
            batch_id,
            &candidates,
            &self.config.component_weights,
            &self.config.composite_weights,
        );

        let status = match ranking.best() {
            None => RankingStatus::Empty,
            Some(best) => self.promote_with_retry(batch_id, best.analysis_id).await,
        };

        if status == RankingStatus::Committed {
            if let Some(best) = ranking.best() {
                for analysis in &mut analyses {
                    analysis.is_best = analysis.id == best.analysis_id;
                }
            }
        }

        // Report analyses in rank order.
        analyses.sort_by_key(|a| {
            ranking
                .entries
                .iter()
                .position(|e| e.analysis_id == a.id)
                .unwrap_or(usize::MAX)
        });

        info!(
            %batch_id,
            succeeded = analyses.len(),
            failed = failures.len(),
            ?status,
            "bulk analysis finished"
        );

        BulkOutcome {
            batch_id,
            analyses,
            failures,
            ranking,
            status,
        }
    }

    async fn promote_with_retry(&self, batch_id: Uuid, analysis_id: Uuid) -> RankingStatus {
        match self.store.promote_best(batch_id, analysis_id).await {
            Ok(()) => return RankingStatus::Committed,
            Err(StoreError::Conflict(_)) => {
                warn!(%batch_id, "promotion conflicted, retrying once");
            }
            Err(e) => {
                error!(%batch_id, error = %e, "promotion failed");
                return RankingStatus::Stale;
            }
        }

        tokio::time::sleep(PROMOTION_RETRY_DELAY).await;
        match self.store.promote_best(batch_id, analysis_id).await {
            Ok(()) => RankingStatus::Committed,
            Err(e) => {
                warn!(%batch_id, error = %e, "promotion left stale; safe to recompute");
                RankingStatus::Stale
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub batch_id: Uuid,
    pub resume_ids: Vec<Uuid>,
    pub job_profile: Option<JobProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStatus {
    /// `is_best` was persisted for the winner.
    Committed,
    /// Ranking was computed but could not be persisted; recompute later.
    Stale,
    /// Nothing in the batch succeeded.
    Empty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub batch_id: Uuid,
    pub analyses: Vec<Analysis>,
    pub failures: Vec<BatchFailure>,
    pub ranking: RankingResult,
    pub status: RankingStatus,
}
