use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{
    RetryPolicy, DEFAULT_API_VERSION, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::scoring::duplicates::DEFAULT_DUPLICATE_THRESHOLD;
use crate::scoring::ontology::SkillOntology;
use crate::scoring::weights::CompositeWeights;
use crate::scoring::ScoringConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` disables AI enrichment; scores then come from the components alone.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_version: String,
    pub gemini_temperature: f32,
    pub gemini_max_tokens: u32,
    pub retry: RetryPolicy,
    pub bulk_concurrency: usize,
    pub duplicate_threshold: f32,
    /// How many recent resumes an upload is compared against.
    pub duplicate_window: i64,
    pub composite_weights: CompositeWeights,
    pub ontology_path: Option<String>,
    pub max_upload_files: usize,
    pub max_file_size_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let composite_weights = match optional_env("SCORE_WEIGHTS") {
            Some(raw) => CompositeWeights::parse(&raw)
                .with_context(|| format!("SCORE_WEIGHTS must look like '0.5,0.3,0.2', got '{raw}'"))?,
            None => CompositeWeights::default(),
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_version: optional_env("GEMINI_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            gemini_temperature: parse_env("GEMINI_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            gemini_max_tokens: parse_env("GEMINI_MAX_TOKENS", DEFAULT_MAX_OUTPUT_TOKENS)?,
            retry: RetryPolicy {
                max_attempts: parse_env("AI_MAX_ATTEMPTS", 3)?,
                initial_backoff: Duration::from_millis(parse_env("AI_INITIAL_BACKOFF_MS", 1000)?),
                max_backoff: Duration::from_millis(parse_env("AI_MAX_BACKOFF_MS", 8000)?),
            },
            bulk_concurrency: parse_env("BULK_CONCURRENCY", 4)?,
            duplicate_threshold: parse_env("DUPLICATE_THRESHOLD", DEFAULT_DUPLICATE_THRESHOLD)?,
            duplicate_window: parse_env("DUPLICATE_WINDOW", 100)?,
            composite_weights,
            ontology_path: optional_env("ONTOLOGY_PATH"),
            max_upload_files: parse_env("MAX_UPLOAD_FILES", 15)?,
            max_file_size_bytes: parse_env("MAX_FILE_SIZE_BYTES", 15 * 1024 * 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Initial scoring snapshot: defaults, overridden by env weights and the ontology file.
    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        let ontology = match &self.ontology_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read ontology file '{path}'"))?;
                serde_json::from_str::<SkillOntology>(&raw)
                    .with_context(|| format!("ontology file '{path}' is not valid"))?
            }
            None => SkillOntology::default(),
        };

        let scoring = ScoringConfig {
            ontology,
            composite_weights: self.composite_weights.clone(),
            duplicate_threshold: self.duplicate_threshold,
            ..ScoringConfig::default()
        };
        scoring.validate().context("invalid scoring configuration")?;
        if self.bulk_concurrency == 0 {
            bail!("BULK_CONCURRENCY must be at least 1");
        }
        Ok(scoring)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
