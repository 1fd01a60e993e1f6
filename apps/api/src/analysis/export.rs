//! Export of current analyses as JSON records or a flat CSV sheet.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::Analysis;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// One exported resume: its filename and current analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub resume_id: Uuid,
    pub filename: String,
    pub analysis: Analysis,
}

/// CSV row. AI columns stay empty when the analysis has no verdict.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    resume_id: Uuid,
    filename: &'a str,
    final_score: f64,
    ats_score: Option<f64>,
    match_percentage: Option<f64>,
    skill_match: f64,
    experience: f64,
    education: f64,
    format: f64,
    keyword_density: f64,
    timeline: f64,
    is_best: bool,
    scoring_version: i32,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a ExportRecord> for CsvRow<'a> {
    fn from(record: &'a ExportRecord) -> Self {
        let a = &record.analysis;
        let scores = &a.component_scores;
        Self {
            resume_id: record.resume_id,
            filename: &record.filename,
            final_score: a.final_score,
            ats_score: a.ai_verdict.as_ref().map(|v| v.ats_score),
            match_percentage: a.ai_verdict.as_ref().map(|v| v.match_percentage),
            skill_match: scores.skill_match,
            experience: scores.experience,
            education: scores.education,
            format: scores.format,
            keyword_density: scores.keyword_density,
            timeline: scores.timeline,
            is_best: a.is_best,
            scoring_version: a.scoring_version,
            created_at: a.created_at,
        }
    }
}

/// Renders `records` as CSV with a header row, even when there are no records.
pub fn to_csv(records: &[ExportRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV export: {e}"))?;
    String::from_utf8(bytes).context("CSV export is not valid UTF-8")
}

const CSV_HEADER: [&str; 14] = [
    "resume_id",
    "filename",
    "final_score",
    "ats_score",
    "match_percentage",
    "skill_match",
    "experience",
    "education",
    "format",
    "keyword_density",
    "timeline",
    "is_best",
    "scoring_version",
    "created_at",
];
