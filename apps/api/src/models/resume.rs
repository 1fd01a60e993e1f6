use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::scoring::features::ResumeFeatures;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub filename: String,
    pub content_type: Option<String>,
    /// PII-masked text; the raw upload is never stored.
    pub masked_text: String,
    pub features: Json<ResumeFeatures>,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
    pub duplicate_similarity: f32,
    pub created_at: DateTime<Utc>,
}

/// What the analysis pipeline needs from a stored resume.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResume {
    pub id: Uuid,
    pub features: ResumeFeatures,
    pub created_at: DateTime<Utc>,
}

impl From<ResumeRow> for StoredResume {
    fn from(row: ResumeRow) -> Self {
        Self {
            id: row.id,
            features: row.features.0,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for a freshly parsed upload.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub filename: String,
    pub content_type: Option<String>,
    pub masked_text: String,
    pub features: ResumeFeatures,
    pub is_duplicate: bool,
    pub duplicate_of: Option<Uuid>,
    pub duplicate_similarity: f32,
}
