use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::scoring::ontology::SkillOntology;
use crate::state::AppState;

/// GET /api/v1/ontology
pub async fn handle_get_ontology(State(state): State<AppState>) -> Json<SkillOntology> {
    Json(state.scoring().await.ontology.clone())
}

/// PUT /api/v1/ontology
///
/// Replaces the vocabulary. In-flight analyses keep the snapshot they started with;
/// later ones are stamped with the new version.
pub async fn handle_put_ontology(
    State(state): State<AppState>,
    Json(ontology): Json<SkillOntology>,
) -> Result<Json<SkillOntology>, AppError> {
    if ontology.skills.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::Validation(
            "ontology must list at least one skill".to_string(),
        ));
    }

    let mut guard = state.scoring.write().await;
    let next = guard.with_ontology(ontology);
    next.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let replaced = next.ontology.clone();
    *guard = Arc::new(next);
    info!(version = replaced.version, skills = replaced.skills.len(), "ontology replaced");
    Ok(Json(replaced))
}
