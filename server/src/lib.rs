use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use boolsearch_core::persist::{load_doc_urls, load_index};
use boolsearch_core::{DocId, QueryEngine, QueryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub doc_ids: Vec<DocId>,
    pub hits: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub query: String,
    pub error: String,
    pub kind: &'static str,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub num_terms: usize,
    pub num_docs: usize,
}

#[derive(Serialize)]
pub struct TermResponse {
    pub term: String,
    pub doc_ids: Vec<DocId>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: QueryEngine,
    pub urls: Arc<HashMap<DocId, String>>,
}

/// Load the index (and the crawler's page listing, when given) once and build
/// the router around them.
pub fn build_app(index_path: &str, urls_path: Option<&str>) -> Result<Router> {
    let index = load_index(index_path)?;
    let urls = match urls_path {
        Some(path) => load_doc_urls(path)?,
        None => HashMap::new(),
    };
    Ok(router(QueryEngine::new(index), urls))
}

pub fn router(engine: QueryEngine, urls: HashMap<DocId, String>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/terms/:term", get(term_handler))
        .with_state(AppState { engine, urls: Arc::new(urls) })
        .layer(cors_from_env())
        .layer(TraceLayer::new_for_http())
}

// CORS_ALLOW_ORIGIN is comma-separated; unset or empty allows any origin
fn cors_from_env() -> CorsLayer {
    let any = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                any
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => any,
    }
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let start = std::time::Instant::now();
    match state.engine.search_sorted(&params.q) {
        Ok(doc_ids) => {
            let elapsed = start.elapsed();
            tracing::info!(query = %params.q, hits = doc_ids.len(), "search");
            let hits = doc_ids.iter().map(|&doc_id| SearchHit { doc_id, url: state.urls.get(&doc_id).cloned() }).collect();
            Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: doc_ids.len(), doc_ids, hits }))
        }
        Err(err) => {
            tracing::info!(query = %params.q, error = %err, "rejected query");
            Err((StatusCode::BAD_REQUEST, Json(error_body(params.q, &err))))
        }
    }
}

fn error_body(query: String, err: &QueryError) -> ErrorResponse {
    ErrorResponse { query, error: err.to_string(), kind: err.kind() }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let index = state.engine.index();
    Json(StatsResponse { num_terms: index.num_terms(), num_docs: index.num_docs() })
}

pub async fn term_handler(State(state): State<AppState>, Path(term): Path<String>) -> Json<TermResponse> {
    let term = term.to_lowercase();
    let mut doc_ids: Vec<DocId> = state.engine.index().postings(&term).into_iter().flatten().copied().collect();
    doc_ids.sort_unstable();
    Json(TermResponse { term, doc_ids })
}
