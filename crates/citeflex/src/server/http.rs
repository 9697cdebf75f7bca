//! HTTP transport: the JSON API and MCP over `POST /mcp`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::rpc::{JsonRpcRequest, handle_request};
use crate::error::CiteError;
use crate::formatters::{citation_json, classification_json, format_export, notes_json, references_json};
use crate::models::{
    ClassifyUrlInput, ExportCitationInput, FormatCitationInput, FormatNotesInput, FormatReferencesInput,
};
use crate::notes::process_notes;
use crate::references::build_references;
use crate::tools::{McpTool, ToolContext};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub tools: Vec<Box<dyn McpTool>>,
    pub ctx: ToolContext,
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState").field("tools", &self.tools.len()).finish()
    }
}

/// A [`CiteError`] rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(CiteError);

impl From<CiteError> for ApiError {
    fn from(err: CiteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::warn!(error = %self.0, "request failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Create the HTTP router.
pub fn create_router(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Router {
    let state = Arc::new(HttpState { tools, ctx });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/api/cite", post(cite))
        .route("/api/classify", post(classify))
        .route("/api/notes", post(notes))
        .route("/api/references", post(references))
        .route("/api/export", post(export))
        .route("/mcp", post(mcp))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "citeflex",
        "version": env!("CARGO_PKG_VERSION"),
        "tools": state.tools.len(),
        "searchFallback": state.ctx.citeflex.config().has_search_fallback()
    }))
}

async fn cite(State(state): State<Arc<HttpState>>, Json(input): Json<FormatCitationInput>) -> ApiResult<Response> {
    input.validate()?;
    let style = state.ctx.style_or_default(input.style);
    let citation = state.ctx.citeflex.cite_with(&input.text, style, input.plain).await?;
    Ok(Json(citation_json(&citation)).into_response())
}

async fn classify(State(state): State<Arc<HttpState>>, Json(input): Json<ClassifyUrlInput>) -> ApiResult<Response> {
    input.validate()?;
    let route = state.ctx.citeflex.classify(&input.url)?;
    let rules = state.ctx.citeflex.router().matching_rules(&input.url)?;
    Ok(Json(classification_json(&route, &rules)).into_response())
}

async fn notes(State(state): State<Arc<HttpState>>, Json(input): Json<FormatNotesInput>) -> ApiResult<Response> {
    input.validate()?;
    let style = state.ctx.style_or_default(input.style);
    let processed = process_notes(&state.ctx.citeflex, &input.notes, style).await;
    Ok(Json(notes_json(&processed, style)).into_response())
}

async fn references(
    State(state): State<Arc<HttpState>>,
    Json(input): Json<FormatReferencesInput>,
) -> ApiResult<Response> {
    input.validate()?;
    let style = state.ctx.style_or_default(input.style);
    let list = build_references(&state.ctx.citeflex, &input.text, style).await;
    Ok(Json(references_json(&list)).into_response())
}

async fn export(State(state): State<Arc<HttpState>>, Json(input): Json<ExportCitationInput>) -> ApiResult<Response> {
    input.validate()?;
    let resolved = state.ctx.citeflex.resolve(&input.text).await?;
    let body = format_export(std::slice::from_ref(&resolved.metadata), input.format);
    Ok(([(header::CONTENT_TYPE, input.format.mime_type())], body).into_response())
}

async fn mcp(State(state): State<Arc<HttpState>>, Json(req): Json<JsonRpcRequest>) -> Response {
    tracing::debug!(method = %req.method, "Handling MCP request");
    match handle_request(&req, &state.tools, &state.ctx).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

