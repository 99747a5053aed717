mod helpers;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use helpers::{sample_verses, test_engine};
use tower::util::ServiceExt;
use verse_finder::config::VerseFinderConfig;
use verse_finder::server::{router, ApiSearchResponse, AppState, HealthResponse};

fn app() -> Router {
    let state = AppState {
        engine: Arc::new(test_engine(sample_verses())),
        config: Arc::new(VerseFinderConfig::default()),
        started_at: chrono::Utc::now(),
    };
    router(Arc::new(state))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn health_reports_dataset() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.verses, 6);
    assert_eq!(health.surahs, 3);
    assert_eq!(health.dimensions, helpers::VOCABULARY.len());
}

#[tokio::test]
async fn index_renders_form() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains(r#"<form method="post" action="/">"#));
    assert!(page.contains(r#"name="num_results""#));
    assert!(page.contains(r#"value="5""#));
}

#[tokio::test]
async fn form_submission_renders_results() {
    let request = Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=patience+and+prayer&num_results=2"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_string(response).await;
    assert!(page.contains("<strong>Al-Baqarah (2:153)</strong>"));
    assert!(page.contains("<strong>Result 2</strong>"));
    assert!(!page.contains("Result 3"));
    assert!(!page.contains("**"));
    assert!(page.contains("<hr />"));
    assert!(page.contains("patience and prayer</textarea>"));
}

#[tokio::test]
async fn verse_text_cannot_inject_markup() {
    let state = AppState {
        engine: Arc::new(test_engine(vec![helpers::verse(
            2,
            153,
            "<script>alert(1)</script> patience and <img src=x onerror=alert(2)>",
        )])),
        config: Arc::new(VerseFinderConfig::default()),
        started_at: chrono::Utc::now(),
    };
    let request = Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=patience&num_results=1"))
        .unwrap();
    let response = router(Arc::new(state)).oneshot(request).await.unwrap();

    let page = body_string(response).await;
    assert!(page.contains("<strong>Al-Baqarah (2:153)</strong>"));
    assert!(!page.contains("<script>"), "page: {page}");
    assert!(!page.contains("<img"), "page: {page}");
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

#[tokio::test]
async fn form_with_empty_query_prompts_for_input() {
    let request = Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("query=&num_results="))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    let page = body_string(response).await;
    assert!(page.contains("Please enter a search query."));
    assert!(page.contains(r#"value="5""#));
}

#[tokio::test]
async fn api_search_clamps_result_count() {
    let response = app()
        .oneshot(
            Request::get("/api/search?q=god&k=50")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ApiSearchResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.query, "god");
    // max_results is 10, but only 6 verses exist.
    assert_eq!(body.results.len(), 6);
    assert!(body.results[0].similarity >= body.results[5].similarity);

    let response = app()
        .oneshot(
            Request::get("/api/search?q=god&k=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: ApiSearchResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.results.len(), 1);
}
