use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRow};
use crate::parsing::extract::{clean_text, detect_kind, extract_text};
use crate::parsing::features::extract_features;
use crate::parsing::pii::mask_pii;
use crate::parsing::ParseError;
use crate::scoring::duplicates::detect_duplicate;
use crate::scoring::features::ResumeFeatures;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadedResume {
    pub id: Uuid,
    pub filename: String,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
    pub duplicate_similarity: f32,
    pub features: ResumeFeatures,
}

#[derive(Serialize)]
pub struct UploadFailure {
    pub filename: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub resumes: Vec<UploadedResume>,
    pub failures: Vec<UploadFailure>,
}

/// Listing entry; the masked text stays behind `GET /api/v1/resumes/:id`.
#[derive(Serialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
}

impl From<ResumeRow> for ResumeSummary {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            created_at: row.created_at,
            skills: row.features.0.skills,
            experience_years: row.features.0.experience_years,
            is_duplicate: row.is_duplicate,
            duplicate_of: row.duplicate_of,
        }
    }
}

#[derive(Serialize)]
pub struct ResumeList {
    pub resumes: Vec<ResumeSummary>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// Most resumes a single listing returns.
const MAX_LISTED_RESUMES: i64 = 1000;

struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /api/v1/resumes
///
/// Accepts one or more files. Each is parsed, masked, checked for duplicates and stored
/// independently; a bad file does not reject its siblings.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParseError::Multipart(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ParseError::Multipart(e.to_string()))?;
        files.push(UploadedFile {
            filename,
            content_type,
            data,
        });

        if files.len() > state.config.max_upload_files {
            return Err(ParseError::TooManyFiles {
                count: files.len(),
                limit: state.config.max_upload_files,
            }
            .into());
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation("No resume files provided".to_string()));
    }

    let mut resumes = Vec::new();
    let mut errors: Vec<(String, AppError)> = Vec::new();
    for file in files {
        let filename = file.filename.clone();
        match store_one(&state, file).await {
            Ok(resume) => resumes.push(resume),
            Err(e) => {
                warn!(%filename, error = %e, "resume upload rejected");
                errors.push((filename, e));
            }
        }
    }

    // Nothing stored: surface the first error with its own status.
    if resumes.is_empty() {
        if let Some((_, e)) = errors.into_iter().next() {
            return Err(e);
        }
        return Err(AppError::Validation("No resume files provided".to_string()));
    }

    let failures = errors
        .into_iter()
        .map(|(filename, e)| UploadFailure {
            filename,
            message: e.to_string(),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(UploadResponse { resumes, failures })))
}

async fn store_one(state: &AppState, file: UploadedFile) -> Result<UploadedResume, AppError> {
    let limit = state.config.max_file_size_bytes;
    if file.data.len() > limit {
        return Err(ParseError::TooLarge {
            name: file.filename,
            size: file.data.len(),
            limit,
        }
        .into());
    }

    let kind = detect_kind(&file.filename, file.content_type.as_deref())?;
    let raw = extract_text(kind, file.data).await?;
    let masked = mask_pii(&clean_text(&raw));
    if masked.trim().is_empty() {
        return Err(ParseError::Empty(file.filename).into());
    }

    let scoring = state.scoring().await;
    let features = extract_features(&masked, &scoring.ontology, Utc::now().date_naive());

    let existing = state
        .store
        .recent_resume_texts(state.config.duplicate_window)
        .await?;
    let duplicate = detect_duplicate(
        state.embedder.as_ref(),
        &masked,
        &existing,
        scoring.duplicate_threshold,
    );
    if duplicate.is_duplicate {
        info!(
            filename = %file.filename,
            duplicate_of = ?duplicate.duplicate_of,
            similarity = duplicate.best_similarity,
            "possible duplicate upload"
        );
    }

    let row = state
        .store
        .insert_resume(NewResume {
            filename: file.filename,
            content_type: file.content_type,
            masked_text: masked,
            features,
            is_duplicate: duplicate.is_duplicate,
            duplicate_of: duplicate.duplicate_of,
            duplicate_similarity: duplicate.best_similarity,
        })
        .await?;

    Ok(UploadedResume {
        id: row.id,
        filename: row.filename,
        is_duplicate: row.is_duplicate,
        duplicate_of: row.duplicate_of,
        duplicate_similarity: row.duplicate_similarity,
        features: row.features.0,
    })
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(state.store.get_resume(id).await?))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeList>, AppError> {
    let rows = state.store.list_resumes(MAX_LISTED_RESUMES).await?;
    Ok(Json(ResumeList {
        resumes: rows.into_iter().map(ResumeSummary::from).collect(),
    }))
}

/// DELETE /api/v1/resumes/:id
/// Removes the resume and every analysis of it.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.delete_resume(id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}

/// DELETE /api/v1/resumes
pub async fn handle_delete_all_resumes(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.store.delete_all_resumes().await?;
    warn!(deleted, "all resumes deleted");
    Ok(Json(DeleteResponse { deleted }))
}
