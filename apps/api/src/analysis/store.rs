//! Persistence seam for resumes and analyses.
//!
//! `PgAnalysisStore` is the production backend. Tests use the in-memory double in
//! [`memory`], which follows the same supersede and promote rules.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::Analysis;
use crate::models::analysis::AnalysisRow;
use crate::models::resume::{NewResume, ResumeRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("batch {0} is being ranked concurrently")]
    Conflict(Uuid),
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, StoreError>;

    async fn get_resume(&self, id: Uuid) -> Result<ResumeRow, StoreError>;

    /// Up to `limit` resumes, newest first.
    async fn list_resumes(&self, limit: i64) -> Result<Vec<ResumeRow>, StoreError>;

    /// Removes a resume together with all of its analyses.
    async fn delete_resume(&self, id: Uuid) -> Result<(), StoreError>;

    /// Removes every resume and analysis; returns how many resumes were deleted.
    async fn delete_all_resumes(&self) -> Result<u64, StoreError>;

    /// The `limit` most recent resumes as `(id, masked_text)`, oldest first.
    async fn recent_resume_texts(&self, limit: i64) -> Result<Vec<(Uuid, String)>, StoreError>;

    /// Inserts `analysis` as the current one for its resume, superseding any previous
    /// current analysis in the same transaction.
    async fn save_analysis(&self, analysis: &Analysis) -> Result<(), StoreError>;

    async fn current_analysis(&self, resume_id: Uuid) -> Result<Option<Analysis>, StoreError>;

    /// Demotes every analysis of `batch_id` and promotes `analysis_id`, atomically.
    /// Fails with [`StoreError::Conflict`] when another promotion holds the batch, and
    /// with [`StoreError::NotFound`] when `analysis_id` is no longer current.
    async fn promote_best(&self, batch_id: Uuid, analysis_id: Uuid) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, filename, content_type, masked_text, features,
                 is_duplicate, duplicate_of, duplicate_similarity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&resume.filename)
        .bind(&resume.content_type)
        .bind(&resume.masked_text)
        .bind(Json(&resume.features))
        .bind(resume.is_duplicate)
        .bind(resume.duplicate_of)
        .bind(resume.duplicate_similarity)
        .fetch_one(&self.pool)
        .await?;

        info!(resume_id = %row.id, is_duplicate = row.is_duplicate, "resume stored");
        Ok(row)
    }

    async fn get_resume(&self, id: Uuid) -> Result<ResumeRow, StoreError> {
        sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_resumes(&self, limit: i64) -> Result<Vec<ResumeRow>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_resume(&self, id: Uuid) -> Result<(), StoreError> {
        // analyses go with it via ON DELETE CASCADE
        let deleted = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        info!(resume_id = %id, "resume deleted");
        Ok(())
    }

    async fn delete_all_resumes(&self) -> Result<u64, StoreError> {
        let deleted = sqlx::query("DELETE FROM resumes").execute(&self.pool).await?;
        info!(count = deleted.rows_affected(), "all resumes deleted");
        Ok(deleted.rows_affected())
    }

    async fn recent_resume_texts(&self, limit: i64) -> Result<Vec<(Uuid, String)>, StoreError> {
        Ok(sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT id, masked_text FROM (
                SELECT id, masked_text, created_at
                FROM resumes
                ORDER BY created_at DESC
                LIMIT $1
            ) recent
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn save_analysis(&self, analysis: &Analysis) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serialises concurrent saves for the same resume.
        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM resumes WHERE id = $1 FOR UPDATE")
                .bind(analysis.resume_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Err(StoreError::NotFound(analysis.resume_id));
        }

        sqlx::query("UPDATE analyses SET is_current = FALSE WHERE resume_id = $1 AND is_current")
            .bind(analysis.resume_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO analyses
                (id, resume_id, batch_id, component_scores, ai_verdict, final_score,
                 is_best, is_current, scoring_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(analysis.id)
        .bind(analysis.resume_id)
        .bind(analysis.batch_id)
        .bind(Json(&analysis.component_scores))
        .bind(analysis.ai_verdict.as_ref().map(Json))
        .bind(analysis.final_score)
        .bind(false)
        .bind(true)
        .bind(analysis.scoring_version)
        .bind(analysis.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(analysis_id = %analysis.id, resume_id = %analysis.resume_id, "analysis saved");
        Ok(())
    }

    async fn current_analysis(&self, resume_id: Uuid) -> Result<Option<Analysis>, StoreError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            "SELECT * FROM analyses WHERE resume_id = $1 AND is_current",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Analysis::from))
    }

    async fn promote_best(&self, batch_id: Uuid, analysis_id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        // Transaction-scoped advisory lock keyed by batch; released on commit or rollback.
        let acquired: bool =
            sqlx::query_scalar("SELECT pg_try_advisory_xact_lock(hashtextextended($1::text, 0))")
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;
        if !acquired {
            return Err(StoreError::Conflict(batch_id));
        }

        sqlx::query("UPDATE analyses SET is_best = FALSE WHERE batch_id = $1 AND is_best")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        let promoted = sqlx::query(
            "UPDATE analyses SET is_best = TRUE WHERE id = $1 AND batch_id = $2 AND is_current",
        )
        .bind(analysis_id)
        .bind(batch_id)
        .execute(&mut *tx)
        .await?;
        if promoted.rows_affected() != 1 {
            return Err(StoreError::NotFound(analysis_id));
        }

        tx.commit().await?;
        info!(%batch_id, %analysis_id, "best analysis promoted");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory test double
// ────────────────────────────────────────────────────────────────────────────
