pub mod health;
pub mod ontology;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::parsing::handlers as parsing;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the file payloads.
const BODY_SLACK_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_upload_files
        .saturating_mul(state.config.max_file_size_bytes)
        .saturating_add(BODY_SLACK_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            get(parsing::handle_list_resumes)
                .post(parsing::handle_upload)
                .delete(parsing::handle_delete_all_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(parsing::handle_get_resume).delete(parsing::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/analysis",
            get(analysis::handle_current_analysis),
        )
        // Analyses
        .route("/api/v1/analyses", post(analysis::handle_analyze))
        .route(
            "/api/v1/batches/analyze",
            post(analysis::handle_bulk_analyze),
        )
        .route(
            "/api/v1/batches/:batch_id/best",
            post(analysis::handle_mark_best),
        )
        .route("/api/v1/exports", post(analysis::handle_export))
        // Scoring vocabulary
        .route(
            "/api/v1/ontology",
            get(ontology::handle_get_ontology).put(ontology::handle_put_ontology),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tokio::sync::RwLock;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::analysis::store::memory::MemoryStore;
    use crate::analysis::store::AnalysisStore;
    use crate::config::Config;
    use crate::llm_client::RetryPolicy;
    use crate::scoring::duplicates::HashEmbedder;
    use crate::scoring::features::ResumeFeatures;
    use crate::scoring::weights::CompositeWeights;
    use crate::scoring::ScoringConfig;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.5-flash".to_string(),
            gemini_api_version: "v1beta".to_string(),
            gemini_temperature: 0.35,
            gemini_max_tokens: 8092,
            retry: RetryPolicy {
                max_attempts: 1,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(1),
            },
            bulk_concurrency: 2,
            duplicate_threshold: 0.95,
            duplicate_window: 100,
            composite_weights: CompositeWeights::default(),
            ontology_path: None,
            max_upload_files: 3,
            max_file_size_bytes: 64 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn test_state(store: Arc<MemoryStore>) -> AppState {
        AppState {
            store,
            reviewer: None,
            embedder: Arc::new(HashEmbedder::default()),
            scoring: Arc::new(RwLock::new(Arc::new(ScoringConfig::default()))),
            config: test_config(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_body(boundary: &str, files: &[(&str, &str, &str)]) -> String {
        let mut body = String::new();
        for (name, content_type, content) in files {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        body
    }

    fn upload_request(files: &[(&str, &str, &str)]) -> Request<Body> {
        let boundary = "resumeboundary";
        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body(boundary, files)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["service"], "resumescope");
        assert_eq!(body["ai_enabled"], false);
    }

    #[tokio::test]
    async fn test_unknown_resume_is_404_envelope() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));
        let uri = format!("/api/v1/resumes/{}", Uuid::new_v4());
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_masks_and_flags_duplicates() {
        let store = Arc::new(MemoryStore::new());
        let app = build_router(test_state(store.clone()));
        let text = "Jane Doe\njane@example.com\nSkills\nRust, Python, Docker\nExperience\nEngineer at Acme\nJan 2020 - Jan 2023";

        let response = app
            .oneshot(upload_request(&[
                ("a.txt", "text/plain", text),
                ("b.txt", "text/plain", text),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let resumes = body["resumes"].as_array().unwrap();
        assert_eq!(resumes.len(), 2);
        assert!(body["failures"].as_array().unwrap().is_empty());

        // Duplicates are flagged, not rejected.
        assert_eq!(resumes[0]["is_duplicate"], false);
        assert_eq!(resumes[1]["is_duplicate"], true);
        assert_eq!(resumes[1]["duplicate_of"], resumes[0]["id"]);

        let first_id = Uuid::parse_str(resumes[0]["id"].as_str().unwrap()).unwrap();
        let stored = store.get_resume(first_id).await.unwrap();
        assert!(!stored.masked_text.contains("jane@example.com"));
        assert!(stored.features.0.skills.contains(&"rust".to_string()));
    }

    #[tokio::test]
    async fn test_upload_rejects_unsupported_type() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));
        let response = app
            .oneshot(upload_request(&[("cv.docx", "application/octet-stream", "PK")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_rejects_too_many_files() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));
        let files = [("a.txt", "text/plain", "Rust"); 4];
        let response = app.oneshot(upload_request(&files)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_analyze_then_fetch_current() {
        let store = Arc::new(MemoryStore::new());
        let resume_id = store.add_resume(ResumeFeatures {
            skills: vec!["rust".to_string()],
            ..ResumeFeatures::default()
        });
        let app = build_router(test_state(store));

        let analyze = Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "resume_id": resume_id }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(analyze).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;

        let uri = format!("/api/v1/resumes/{resume_id}/analysis");
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let current = body_json(response).await;
        assert_eq!(current["id"], created["id"]);
        assert_eq!(current["is_current"], true);
    }

    #[tokio::test]
    async fn test_bulk_rejects_empty_ids() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/batches/analyze")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "resume_ids": [] }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_ontology_bumps_version() {
        let state = test_state(Arc::new(MemoryStore::new()));
        let app = build_router(state.clone());
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/ontology")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "version": 1, "skills": ["rust", "zig"] }).to_string(),
            ))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["version"], 2);
        assert_eq!(state.scoring().await.version(), 2);
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn skilled(skills: &[&str], years: f64) -> ResumeFeatures {
        ResumeFeatures {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: years,
            ..ResumeFeatures::default()
        }
    }

    #[tokio::test]
    async fn test_list_resumes_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let older = store.add_resume(skilled(&["sql"], 1.0));
        let newer = store.add_resume(skilled(&["rust"], 3.0));
        let app = build_router(test_state(store));

        let response = app.oneshot(empty_request("GET", "/api/v1/resumes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let resumes = body["resumes"].as_array().unwrap();
        assert_eq!(resumes.len(), 2);
        assert_eq!(resumes[0]["id"], json!(newer));
        assert_eq!(resumes[0]["skills"], json!(["rust"]));
        assert_eq!(resumes[1]["id"], json!(older));
        assert!(resumes[0].get("masked_text").is_none());
    }

    #[tokio::test]
    async fn test_delete_resume_removes_its_analyses() {
        let store = Arc::new(MemoryStore::new());
        let doomed = store.add_resume(skilled(&["rust"], 2.0));
        let kept = store.add_resume(skilled(&["sql"], 2.0));
        let app = build_router(test_state(store.clone()));

        for id in [doomed, kept] {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/v1/analyses", json!({ "resume_id": id })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let uri = format!("/api/v1/resumes/{doomed}");
        let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted"], 1);

        assert!(store.analyses().iter().all(|a| a.resume_id == kept));
        let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // deleting again is a 404, not a silent success
        let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_all_resumes_reports_count() {
        let store = Arc::new(MemoryStore::new());
        store.add_resume(skilled(&["rust"], 2.0));
        store.add_resume(skilled(&["sql"], 2.0));
        let app = build_router(test_state(store.clone()));

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/v1/resumes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deleted"], 2);

        let response = app.oneshot(empty_request("GET", "/api/v1/resumes")).await.unwrap();
        assert!(body_json(response).await["resumes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mark_best_overrides_ranking() {
        let store = Arc::new(MemoryStore::new());
        let strong = store.add_resume(skilled(&["rust", "aws", "sql", "docker"], 8.0));
        let weak = store.add_resume(skilled(&["excel"], 1.0));
        let app = build_router(test_state(store.clone()));

        let batch_id = Uuid::new_v4();
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/batches/analyze",
                json!({ "batch_id": batch_id, "resume_ids": [strong, weak] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ranked_best = store.best_in_batch(batch_id)[0].resume_id;
        let runner_up = if ranked_best == strong { weak } else { strong };

        let uri = format!("/api/v1/batches/{batch_id}/best");
        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({ "resume_id": runner_up })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["is_best"], true);

        let best = store.best_in_batch(batch_id);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].resume_id, runner_up);

        // a resume outside the batch cannot be promoted into it
        let outsider = store.add_resume(skilled(&["go"], 2.0));
        let response = app
            .oneshot(json_request("POST", &uri, json!({ "resume_id": outsider })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_csv_and_json() {
        let store = Arc::new(MemoryStore::new());
        let analysed = store.add_resume(skilled(&["rust"], 4.0));
        let unanalysed = store.add_resume(skilled(&["sql"], 1.0));
        let app = build_router(test_state(store));

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/analyses", json!({ "resume_id": analysed })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/exports",
                json!({ "resume_ids": [analysed, unanalysed], "format": "csv" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("resume_id,filename,final_score"));
        assert!(lines[1].starts_with(&analysed.to_string()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/exports",
                json!({ "resume_ids": [analysed] }),
            ))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["resume_id"], json!(analysed));
        assert!(body[0]["analysis"]["component_scores"]["skill_match"].is_number());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/exports",
                json!({ "resume_ids": [analysed], "format": "xlsx" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
