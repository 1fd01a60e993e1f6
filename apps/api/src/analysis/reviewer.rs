//! AI Reviewer: pluggable, trait-based critique of one resume.
//!
//! Production: `GeminiReviewer` over `LlmClient`. `AppState` holds an
//! `Option<Arc<dyn AiReviewer>>`; `None` disables enrichment entirely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::prompts::{build_ats_review_prompt, ATS_REVIEW_SYSTEM};
use crate::llm_client::{parse_json_text, LlmClient, LlmError};
use crate::scoring::features::{JobProfile, ResumeFeatures};
use crate::scoring::normalize::bounded;
use crate::scoring::ranking::AiScores;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionFeedback {
    pub name: String,
    #[serde(default)]
    pub present: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub feedback: String,
}

/// Critique attached to an analysis. Scores are clamped to 0-100 on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiVerdict {
    pub ats_score: f64,
    pub match_percentage: f64,
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub keyword_density: Option<f64>,
    pub section_feedback: Vec<SectionFeedback>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    /// Which reviewer produced this verdict.
    pub reviewer: String,
}

impl AiVerdict {
    pub fn scores(&self) -> AiScores {
        AiScores {
            ats_score: self.ats_score,
            match_percentage: self.match_percentage,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire shape requested in the prompt
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawVerdict {
    ats_score: f64,
    match_percentage: f64,
    #[serde(default)]
    keyword_analysis: RawKeywords,
    #[serde(default)]
    section_analysis: Vec<SectionFeedback>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKeywords {
    #[serde(default)]
    found: Vec<String>,
    #[serde(default)]
    missing: Vec<String>,
    density: Option<f64>,
}

/// Drops markdown emphasis and list markers the model sometimes adds anyway.
fn plain(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| {
            item.replace("**", "")
                .trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .filter(|item| !item.is_empty())
        .collect()
}

impl RawVerdict {
    fn into_verdict(self, reviewer: &str) -> AiVerdict {
        AiVerdict {
            ats_score: bounded(self.ats_score),
            match_percentage: bounded(self.match_percentage),
            found_keywords: self.keyword_analysis.found,
            missing_keywords: self.keyword_analysis.missing,
            keyword_density: self.keyword_analysis.density.map(bounded),
            section_feedback: self
                .section_analysis
                .into_iter()
                .map(|s| SectionFeedback {
                    score: bounded(s.score),
                    ..s
                })
                .collect(),
            strengths: plain(self.strengths),
            weaknesses: plain(self.weaknesses),
            recommendations: plain(self.recommendations),
            reviewer: reviewer.to_string(),
        }
    }
}

/// Parses a reviewer reply into a verdict. A reply without both scores is rejected.
pub fn parse_verdict(text: &str, reviewer: &str) -> Result<AiVerdict, LlmError> {
    let raw: RawVerdict = parse_json_text(text)?;
    Ok(raw.into_verdict(reviewer))
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait AiReviewer: Send + Sync {
    fn name(&self) -> &str;

    async fn review(
        &self,
        features: &ResumeFeatures,
        profile: Option<&JobProfile>,
    ) -> Result<AiVerdict, LlmError>;
}

pub struct GeminiReviewer {
    llm: LlmClient,
}

impl GeminiReviewer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AiReviewer for GeminiReviewer {
    fn name(&self) -> &str {
        self.llm.model()
    }

    async fn review(
        &self,
        features: &ResumeFeatures,
        profile: Option<&JobProfile>,
    ) -> Result<AiVerdict, LlmError> {
        let job_text = profile.map(JobProfile::as_prompt_text).unwrap_or_default();
        let prompt = build_ats_review_prompt(&features.text, &job_text);

        let response = self.llm.call(&prompt, ATS_REVIEW_SYSTEM).await?;
        let Some(text) = response.text() else {
            warn!(
                reviewer = self.name(),
                finish_reason = response.finish_reason().unwrap_or("unknown"),
                "reviewer returned no text"
            );
            return Err(LlmError::EmptyContent);
        };
        let verdict = parse_verdict(&text, self.name())?;

        info!(
            reviewer = self.name(),
            ats_score = verdict.ats_score,
            "AI review complete"
        );
        Ok(verdict)
    }
}
