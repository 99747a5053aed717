//! Web form and JSON API over the search engine.
//!
//! # Endpoints
//!
//! - `GET /` - search form
//! - `POST /` - submit the form, re-render with results
//! - `GET /api/search?q=..&k=..` - JSON results
//! - `GET /health` - dataset and model summary

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use pulldown_cmark::{html, Event, Parser};
use serde::{Deserialize, Serialize};

use crate::config::VerseFinderConfig;
use crate::embedding;
use crate::search::{SearchEngine, SearchResult};
use crate::verses::VerseStore;

/// Shared application state. Everything in it is read-only after startup.
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub config: Arc<VerseFinderConfig>,
    pub started_at: DateTime<Utc>,
}

/// Form body posted by the search page.
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub query: String,
    /// Kept as text so an empty or junk field falls back to the default.
    #[serde(default)]
    pub num_results: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiSearchParams {
    #[serde(default)]
    pub q: String,
    pub k: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub verses: usize,
    pub surahs: usize,
    pub dimensions: usize,
    pub started_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/search", get(api_search))
        .route("/health", get(health))
        .with_state(state)
}

/// GET / - empty form
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let k = state.config.clamp_results(None);
    Html(render_page(&state.config, "", k, None))
}

/// POST / - run the search and show results under the form
async fn submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Html<String> {
    let requested = form
        .num_results
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok());
    let k = state.config.clamp_results(requested);

    let engine = Arc::clone(&state.engine);
    let query = form.query.clone();
    let output = match tokio::task::spawn_blocking(move || {
        engine.search_markdown(&query, k as i64)
    })
    .await
    {
        Ok(Ok(markdown)) => markdown,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "search failed");
            format!("Search failed: {e}")
        }
        Err(e) => {
            tracing::error!(error = %e, "search task panicked");
            "Search failed: internal error".to_string()
        }
    };

    Html(render_page(&state.config, &form.query, k, Some(&output)))
}

/// GET /api/search - JSON results
async fn api_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiSearchParams>,
) -> impl IntoResponse {
    let k = state.config.clamp_results(params.k);
    let engine = Arc::clone(&state.engine);
    let query = params.q.clone();

    match tokio::task::spawn_blocking(move || engine.search(&query, k as i64)).await {
        Ok(Ok(results)) => (
            StatusCode::OK,
            Json(ApiSearchResponse {
                query: params.q,
                results,
            }),
        )
            .into_response(),
        Ok(Err(e)) => error_response(e.to_string()),
        Err(e) => error_response(format!("search task failed: {e}")),
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.engine.store();
    Json(HealthResponse {
        status: "ok".into(),
        verses: store.len(),
        surahs: store.surah_count(),
        dimensions: state.engine.dimensions(),
        started_at: state.started_at.to_rfc3339(),
    })
}

fn error_response(error: String) -> axum::response::Response {
    tracing::warn!(%error, "api search failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error })).into_response()
}

// ── Page rendering ────────────────────────────────────────────────────────────

/// Escape plain text for HTML by passing it through the renderer as a text event.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    html::push_html(&mut out, std::iter::once(Event::Text(s.into())));
    out
}

/// Render markdown to HTML. Raw HTML in the source is shown as text, so
/// dataset fields cannot inject markup into the page.
fn render_markdown_html(markdown: &str) -> String {
    let events = Parser::new(markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

const EXAMPLE_QUERIES: [&str; 5] = [
    "mercy and forgiveness",
    "patience in hardship",
    "prayer and worship",
    "guidance and wisdom",
    "gratitude and thankfulness",
];

fn render_page(config: &VerseFinderConfig, query: &str, k: usize, output: Option<&str>) -> String {
    let examples: String = EXAMPLE_QUERIES
        .iter()
        .map(|q| format!("<li>\"{}\"</li>", escape_text(q)))
        .collect();
    let output = output
        .map(|md| format!("<section id=\"results\">{}</section>", render_markdown_html(md)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI-Powered Quran Verse Finder</title>
<style>
body {{ font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}
textarea {{ width: 100%; }}
#results hr {{ border: 0; border-top: 1px solid #ccc; }}
</style>
</head>
<body>
<h1>AI-Powered Quran Verse Finder</h1>
<p>Search any topic and find relevant Quran verses using semantic search.</p>
<form method="post" action="/">
<label for="query">Search Query</label>
<textarea id="query" name="query" rows="2" placeholder="e.g., mercy, prayer, patience, forgiveness, guidance...">{query}</textarea>
<label for="num_results">Number of Results</label>
<input id="num_results" name="num_results" type="number" min="1" max="{max}" step="1" value="{k}">
<button type="submit">Search Verses</button>
</form>
<h3>Example Queries:</h3>
<ul>{examples}</ul>
{output}
<hr>
<p>Verses are matched by meaning using sentence embeddings ({model}), even when they share no keywords with the query.</p>
</body>
</html>
"#,
        query = escape_text(query),
        max = config.search.max_results.max(1),
        k = k,
        examples = examples,
        output = output,
        model = escape_text(&config.embedding.model),
    )
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Load verses, load the model, embed everything, then build the shared state.
pub async fn build_state(config: VerseFinderConfig) -> Result<Arc<AppState>> {
    let dataset_path = config.resolved_dataset_path();
    let store = VerseStore::load(&dataset_path)?;
    anyhow::ensure!(
        !store.is_empty(),
        "dataset {} contains no verses; run `verse-finder dataset fetch` first",
        dataset_path.display()
    );

    let embedding_config = config.embedding.clone();
    let batch_size = config.search.batch_size;
    let engine = tokio::task::spawn_blocking(move || -> Result<SearchEngine> {
        tracing::info!(model = %embedding_config.model, "loading embedding model");
        let provider: Arc<dyn embedding::EmbeddingProvider> =
            Arc::from(embedding::create_provider(&embedding_config)?);
        Ok(SearchEngine::build(store, provider, batch_size, true)?)
    })
    .await
    .context("startup task failed")??;

    Ok(Arc::new(AppState {
        engine: Arc::new(engine),
        config: Arc::new(config),
        started_at: Utc::now(),
    }))
}

/// Start the web server. Blocks until Ctrl-C.
pub async fn serve(config: VerseFinderConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(config).await?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "verse finder listening at http://{bind_addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down web server");
        })
        .await?;

    Ok(())
}
