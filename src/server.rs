//! HTTP server.
//!
//! Exposes document search and PDF resolution over HTTP, plus static
//! downloads of the resolved PDFs.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Search form |
//! | `GET`  | `/search?q=&format=` | Document search (HTML unless JSON is requested) |
//! | `GET`  | `/api/search?q=` | Document search, JSON |
//! | `GET`  | `/api/get_pdf_link?q=` | Best single PDF link, JSON |
//! | `GET`  | `/get_pdf/{query}?format=` | All PDFs matching any query term (JSON unless HTML is requested) |
//! | `GET`  | `/pretty_pdf/{query}?format=` | Same lookup, HTML unless JSON is requested |
//! | `GET`  | `{url_prefix}/{filename}` | PDF download |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! JSON endpoints answer validation failures with status 400 and
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "Missing query parameter 'q'" } }
//! ```
//!
//! HTML endpoints answer with the same status and a plain-text message.
//! An empty path query (`/get_pdf/`) is rejected the same way. A
//! multi-term lookup that finds nothing answers 404 with an empty
//! `matched_files` list and a `message`.

use axum::{
    extract::{Path, Query as QueryString, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::artifacts::resolve_artifacts;
use crate::config::Config;
use crate::models::{MatchPolicy, Query};
use crate::render::{self, OutputFormat};
use crate::search::search_documents;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    templates: Arc<Environment<'static>>,
}

/// Starts the HTTP server on `[server].bind`.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = build_router(Arc::new(config.clone()))?;

    tracing::info!(
        corpus = %config.corpus.root.display(),
        artifacts = %config.artifacts.root.display(),
        "serving on http://{}",
        bind_addr
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the router with every route and the static PDF mount.
///
/// Fails only if the bundled HTML templates do not compile.
pub fn build_router(config: Arc<Config>) -> anyhow::Result<Router> {
    let templates = Arc::new(render::templates()?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/", get(handle_index))
        .route("/search", get(handle_search))
        .route("/api/search", get(handle_api_search))
        .route("/api/get_pdf_link", get(handle_pdf_link))
        .route("/get_pdf/{query}", get(handle_get_pdf))
        .route("/get_pdf/", get(handle_missing_path_query))
        .route("/pretty_pdf/{query}", get(handle_pretty_pdf))
        .route("/pretty_pdf/", get(handle_missing_path_query))
        .route("/health", get(handle_health));

    if let Some(mount) = config.artifacts.mount_path() {
        app = app.nest_service(mount, ServeDir::new(&config.artifacts.root));
    }

    Ok(app.layer(cors).with_state(AppState { config, templates }))
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    format: OutputFormat,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.format {
            OutputFormat::Json => {
                let body = ErrorBody {
                    error: ErrorDetail {
                        code: self.code,
                        message: self.message,
                    },
                };
                (self.status, Json(body)).into_response()
            }
            OutputFormat::Html => (self.status, self.message).into_response(),
        }
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(format: OutputFormat, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
        format,
    }
}

/// Constructs a 500 error.
fn internal(format: OutputFormat, err: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %err, "request failed");
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: err.to_string(),
        format,
    }
}

fn parse_query(raw: Option<&str>, format: OutputFormat) -> Result<Query, AppError> {
    Query::parse(raw.unwrap_or_default())
        .map_err(|_| bad_request(format, "Missing query parameter 'q'"))
}

fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    format: Option<String>,
}

#[derive(Deserialize)]
struct FormatParams {
    format: Option<String>,
}

// ============ GET / ============

async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let html =
        render::index_html(&state.templates).map_err(|e| internal(OutputFormat::Html, e))?;
    Ok(Html(html))
}

// ============ GET /search, GET /api/search ============

async fn handle_search(
    State(state): State<AppState>,
    headers: HeaderMap,
    QueryString(params): QueryString<SearchParams>,
) -> Result<Response, AppError> {
    let format = OutputFormat::negotiate(
        params.format.as_deref(),
        accept_header(&headers),
        OutputFormat::Html,
    );
    respond_search(state, params.q, format).await
}

async fn handle_api_search(
    State(state): State<AppState>,
    QueryString(params): QueryString<SearchParams>,
) -> Result<Response, AppError> {
    respond_search(state, params.q, OutputFormat::Json).await
}

async fn respond_search(
    state: AppState,
    raw: Option<String>,
    format: OutputFormat,
) -> Result<Response, AppError> {
    let query = parse_query(raw.as_deref(), format)?;

    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || search_documents(&config, &query))
        .await
        .map_err(|e| internal(format, e))?
        .map_err(|e| internal(format, e))?;

    let response = match format {
        OutputFormat::Json => {
            Json(render::search_value(&result).map_err(|e| internal(format, e))?).into_response()
        }
        OutputFormat::Html => Html(
            render::search_html(&state.templates, &result).map_err(|e| internal(format, e))?,
        )
        .into_response(),
    };
    Ok(response)
}

// ============ GET /api/get_pdf_link ============

async fn handle_pdf_link(
    State(state): State<AppState>,
    QueryString(params): QueryString<SearchParams>,
) -> Result<Response, AppError> {
    let format = OutputFormat::Json;
    let query = parse_query(params.q.as_deref(), format)?;

    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || {
        resolve_artifacts(&config, &query, MatchPolicy::BestMatch)
    })
    .await
    .map_err(|e| internal(format, e))?;

    let body = render::artifacts_value(&result).map_err(|e| internal(format, e))?;
    Ok(Json(body).into_response())
}

// ============ GET /get_pdf/{query}, GET /pretty_pdf/{query} ============

async fn handle_get_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw): Path<String>,
    QueryString(params): QueryString<FormatParams>,
) -> Result<Response, AppError> {
    let format = OutputFormat::negotiate(
        params.format.as_deref(),
        accept_header(&headers),
        OutputFormat::Json,
    );
    respond_pdfs(state, raw, format).await
}

async fn handle_pretty_pdf(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw): Path<String>,
    QueryString(params): QueryString<FormatParams>,
) -> Result<Response, AppError> {
    let format = OutputFormat::negotiate(
        params.format.as_deref(),
        accept_header(&headers),
        OutputFormat::Html,
    );
    respond_pdfs(state, raw, format).await
}

async fn handle_missing_path_query() -> AppError {
    bad_request(OutputFormat::Json, "Missing query in path")
}

async fn respond_pdfs(
    state: AppState,
    raw: String,
    format: OutputFormat,
) -> Result<Response, AppError> {
    let query = parse_query(Some(&raw), format)?;

    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || {
        resolve_artifacts(&config, &query, MatchPolicy::MultiTerm)
    })
    .await
    .map_err(|e| internal(format, e))?;

    let response = match format {
        OutputFormat::Json => {
            let status = if result.is_empty() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            let body = render::artifacts_value(&result).map_err(|e| internal(format, e))?;
            (status, Json(body)).into_response()
        }
        OutputFormat::Html => Html(
            render::artifacts_html(&state.templates, &result)
                .map_err(|e| internal(format, e))?,
        )
        .into_response(),
    };
    Ok(response)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
