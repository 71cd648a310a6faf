//! Route tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::future::BoxFuture;
use hn_openapi::{AuthSchemaProvider, BoxError, StaticSchemaProvider, custom_document};
use hn_server::routes::GENERIC_SCHEMA_ERROR;
use hn_server::{AppState, DocsService, router};
use serde_json::{Value, json};
use tower::ServiceExt;

struct FailingProvider;

impl AuthSchemaProvider for FailingProvider {
    fn generate_openapi_schema(&self) -> BoxFuture<'_, Result<Value, BoxError>> {
        Box::pin(async { Err::<Value, BoxError>("connection refused".into()) })
    }
}

fn auth_schema() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Better Auth", "version": "1.2.0"},
        "paths": {"/api/auth/sign-in/email": {"post": {"tags": ["Auth"], "summary": "Sign in"}}},
        "tags": [{"name": "Auth"}]
    })
}

fn app_with(provider: Arc<dyn AuthSchemaProvider>, expose_errors: bool) -> axum::Router {
    let docs = DocsService::new(provider, custom_document().unwrap());
    router(AppState::new(docs, expose_errors))
}

fn app() -> axum::Router {
    app_with(Arc::new(StaticSchemaProvider::new(auth_schema())), true)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_open_api_returns_merged_document() {
    let (status, body) = get(app(), "/api/open-api").await;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_str(&body).unwrap();
    let paths: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
    assert_eq!(paths, ["/api/auth/sign-in/email", "/api/posts/create-post"]);
    assert_eq!(doc["info"]["title"], "Hacker News Clone API");
    assert_eq!(doc["info"]["version"], "1.2.0");
    assert!(doc["components"]["securitySchemes"]["cookieAuth"].is_object());
}

#[tokio::test]
async fn test_open_api_upstream_failure_in_development() {
    let (status, body) = get(app_with(Arc::new(FailingProvider), true), "/api/open-api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let error: Value = serde_json::from_str(&body).unwrap();
    let message = error["error"].as_str().unwrap();
    assert!(message.contains("connection refused"), "{message}");
}

#[tokio::test]
async fn test_open_api_upstream_failure_in_production() {
    let (status, body) = get(app_with(Arc::new(FailingProvider), false), "/api/open-api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": GENERIC_SCHEMA_ERROR})
    );
}

#[tokio::test]
async fn test_path_conflict_is_a_server_error() {
    let auth = json!({
        "openapi": "3.0.0",
        "info": {"title": "Auth", "version": "1.0.0"},
        "paths": {"/api/posts/create-post": {"get": {"summary": "Shadow"}}}
    });

    let app = app_with(Arc::new(StaticSchemaProvider::new(auth.clone())), true);
    let (status, body) = get(app, "/api/open-api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("/api/posts/create-post"));

    let app = app_with(Arc::new(StaticSchemaProvider::new(auth)), false);
    let (status, body) = get(app, "/api/open-api").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": GENERIC_SCHEMA_ERROR})
    );
}

#[tokio::test]
async fn test_docs_page_points_at_schema() {
    let response = app()
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains(r#"data-url="/api/open-api""#));
    assert!(html.contains("<title>Hacker News Clone API</title>"));
}

#[tokio::test]
async fn test_markdown_route() {
    let response = app()
        .oneshot(Request::builder().uri("/api/docs.md").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let markdown = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(markdown.starts_with("# Hacker News Clone API\n"));
    assert!(markdown.contains("### Auth\n"));
    assert!(markdown.contains("### Posts\n"));
    assert!(markdown.contains("#### `POST /api/posts/create-post`\n"));
}

#[tokio::test]
async fn test_markdown_route_hides_errors_in_production() {
    let (status, body) = get(app_with(Arc::new(FailingProvider), false), "/api/docs.md").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("connection refused"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = get(app(), "/api/unknown").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
