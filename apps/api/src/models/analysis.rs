use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::reviewer::AiVerdict;
use crate::analysis::Analysis;
use crate::scoring::components::ComponentScoreSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub component_scores: Json<ComponentScoreSet>,
    pub ai_verdict: Option<Json<AiVerdict>>,
    pub final_score: f64,
    pub is_best: bool,
    pub is_current: bool,
    pub scoring_version: i32,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Self {
            id: row.id,
            resume_id: row.resume_id,
            batch_id: row.batch_id,
            component_scores: row.component_scores.0,
            ai_verdict: row.ai_verdict.map(|v| v.0),
            final_score: row.final_score,
            is_best: row.is_best,
            is_current: row.is_current,
            scoring_version: row.scoring_version,
            created_at: row.created_at,
        }
    }
}
