//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - task and problem API under `/api/v1/...`
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/tasks", get(http::http_list_tasks))
        .route("/api/v1/tasks/reload", post(http::http_post_reload))
        .route("/api/v1/tasks/:task_id", get(http::http_get_task))
        .route("/api/v1/tasks/:task_id/problems/:problem_id/input", get(http::http_get_input))
        .route("/api/v1/tasks/:task_id/submission", post(http::http_post_submission))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::CatalogConfig;

    const CATALOG: &str = r#"
[ui_translations.fr]
"file upload" = "envoi de fichier"

[tasks.intro]
environment = "python3"

[tasks.intro.problems.code1]
type = "code"
name = "Hello"
header = "Print hello"

[tasks.intro.problems.up]
type = "file"
name = "Upload"
header = "Send your archive"
max_size = 2048
allowed_exts = [".zip"]

[tasks.intro.problems.q1]
type = "multiple-choice"
name = "Quiz"
header = "Pick"
limit = 2
choices = [
  { text = "a", valid = true },
  { text = "b", valid = true },
  { text = "c" },
  { text = "d" },
  { text = "e" },
]
"#;

    fn app() -> Router {
        let cfg = CatalogConfig::from_toml(CATALOG).unwrap();
        build_router(Arc::new(AppState::from_config(&cfg)))
    }

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        call(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn health_and_listing() {
        assert_eq!(get_json("/api/v1/health").await, (StatusCode::OK, json!({"ok": true})));
        assert_eq!(get_json("/api/v1/tasks").await.1, json!({"tasks": ["intro"]}));
    }

    #[tokio::test]
    async fn task_summary_has_localized_type_names() {
        let (status, body) = get_json("/api/v1/tasks/intro?language=fr").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["environment"], "python3");
        assert_eq!(body["problems"][1]["type"], "file");
        assert_eq!(body["problems"][1]["type_name"], "envoi de fichier");
        assert_eq!(body["problems"][2]["type_name"], "multiple choice");
    }

    #[tokio::test]
    async fn multiple_choice_input_is_seeded() {
        let uri = "/api/v1/tasks/intro/problems/q1/input?language=en&seed=s1";
        let (status, first) = get_json(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["template"], "tasks/multiple_choice.html");
        let choices = first["choices"].as_array().unwrap();
        assert_eq!(choices.len(), 2);
        assert!(choices.iter().all(|c| c.get("valid").is_none()));
        // "a" and "b" (indices 0 and 1) are the valid ones.
        assert_eq!(choices.iter().filter(|c| c["index"].as_u64().unwrap() < 2).count(), 1);
        assert_eq!(get_json(uri).await.1, first);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        assert_eq!(get_json("/api/v1/tasks/nope").await.0, StatusCode::NOT_FOUND);
        let (status, body) = get_json("/api/v1/tasks/intro/problems/zz/input").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("zz"));
    }

    #[tokio::test]
    async fn submission_adapts_file_fields() {
        let body = json!({"input": {
            "code1": "print('hello')",
            "up": {"filename": "a.zip", "value": "aGk="},
            "q1": ["0", null],
            "notes": {"left": "a", "right": "b"}
        }});
        let req = Request::post("/api/v1/tasks/intro/submission")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, out) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["input"]["code1"], "print('hello')");
        assert_eq!(out["input"]["up"], json!({"filename": "a.zip", "value": "aGk="}));
        assert_eq!(out["input"]["q1"], json!(["0", null]));
        assert_eq!(out["input"]["notes"], json!({"left": "a", "right": "b"}));

        let req = Request::post("/api/v1/tasks/intro/submission")
            .header("content-type", "application/json")
            .body(Body::from(json!({"input": {"up": "oops"}}).to_string()))
            .unwrap();
        let (status, out) = call(req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(out["input"]["up"], json!({}));
    }

    #[tokio::test]
    async fn reload_without_config_path_is_unavailable() {
        let req = Request::post("/api/v1/tasks/reload").body(Body::empty()).unwrap();
        assert_eq!(call(req).await.0, StatusCode::SERVICE_UNAVAILABLE);
    }
}
