use std::sync::Arc;

use tokio::sync::RwLock;

use crate::analysis::pipeline::Analyzer;
use crate::analysis::reviewer::AiReviewer;
use crate::analysis::store::AnalysisStore;
use crate::config::Config;
use crate::scoring::duplicates::TextEmbedder;
use crate::scoring::ScoringConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
    /// `None` when no Gemini key is configured.
    pub reviewer: Option<Arc<dyn AiReviewer>>,
    pub embedder: Arc<dyn TextEmbedder>,
    /// Current scoring snapshot. Requests clone the inner `Arc` and keep using it even if
    /// the ontology is replaced mid-flight.
    pub scoring: Arc<RwLock<Arc<ScoringConfig>>>,
    pub config: Config,
}

impl AppState {
    pub async fn scoring(&self) -> Arc<ScoringConfig> {
        self.scoring.read().await.clone()
    }

    pub fn analyzer<'a>(&'a self, scoring: &'a ScoringConfig) -> Analyzer<'a> {
        Analyzer {
            store: self.store.as_ref(),
            reviewer: self.reviewer.as_deref(),
            config: scoring,
        }
    }
}
