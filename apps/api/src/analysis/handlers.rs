use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::analysis::export::{to_csv, ExportFormat, ExportRecord};
use crate::analysis::pipeline::{BulkOutcome, BulkRequest};
use crate::analysis::Analysis;
use crate::errors::AppError;
use crate::scoring::features::JobProfile;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub resume_id: Uuid,
    #[serde(default)]
    pub job_profile: Option<JobProfile>,
}

#[derive(Deserialize)]
pub struct BulkAnalyzeRequest {
    /// A new batch id is generated when absent.
    #[serde(default)]
    pub batch_id: Option<Uuid>,
    pub resume_ids: Vec<Uuid>,
    #[serde(default)]
    pub job_profile: Option<JobProfile>,
}

#[derive(Deserialize)]
pub struct MarkBestRequest {
    pub resume_id: Uuid,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub resume_ids: Vec<Uuid>,
    #[serde(default)]
    pub format: ExportFormat,
}

/// POST /api/v1/analyses
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Analysis>, AppError> {
    let scoring = state.scoring().await;
    let analysis = state
        .analyzer(&scoring)
        .analyze_resume(req.resume_id, req.job_profile.as_ref(), None)
        .await?;
    Ok(Json(analysis))
}

/// POST /api/v1/batches/analyze
pub async fn handle_bulk_analyze(
    State(state): State<AppState>,
    Json(req): Json<BulkAnalyzeRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    if req.resume_ids.is_empty() {
        return Err(AppError::Validation("resume_ids must not be empty".to_string()));
    }

    let scoring = state.scoring().await;
    let request = BulkRequest {
        batch_id: req.batch_id.unwrap_or_else(Uuid::new_v4),
        resume_ids: req.resume_ids,
        job_profile: req.job_profile,
    };
    let outcome = state
        .analyzer(&scoring)
        .run_bulk(request, state.config.bulk_concurrency)
        .await;
    Ok(Json(outcome))
}

/// GET /api/v1/resumes/:id/analysis
pub async fn handle_current_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Analysis>, AppError> {
    let analysis = state
        .store
        .current_analysis(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis for resume {id}")))?;
    Ok(Json(analysis))
}

/// POST /api/v1/batches/:batch_id/best
///
/// Manually promotes the resume's current analysis in this batch, replacing whatever
/// the ranking chose.
pub async fn handle_mark_best(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(req): Json<MarkBestRequest>,
) -> Result<Json<Analysis>, AppError> {
    let mut analysis = state
        .store
        .current_analysis(req.resume_id)
        .await?
        .filter(|a| a.batch_id == Some(batch_id))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Resume {} has no current analysis in batch {batch_id}",
                req.resume_id
            ))
        })?;

    state.store.promote_best(batch_id, analysis.id).await?;
    analysis.is_best = true;
    info!(%batch_id, resume_id = %req.resume_id, "best analysis set manually");
    Ok(Json(analysis))
}

/// POST /api/v1/exports
/// Resumes without a current analysis are skipped.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let mut records = Vec::new();
    for resume_id in req.resume_ids {
        let Some(analysis) = state.store.current_analysis(resume_id).await? else {
            continue;
        };
        let resume = state.store.get_resume(resume_id).await?;
        records.push(ExportRecord {
            resume_id,
            filename: resume.filename,
            analysis,
        });
    }

    info!(records = records.len(), format = ?req.format, "analyses exported");
    match req.format {
        ExportFormat::Json => Ok(Json(records).into_response()),
        ExportFormat::Csv => Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"analyses_export.csv\"",
                ),
            ],
            to_csv(&records)?,
        )
            .into_response()),
    }
}
