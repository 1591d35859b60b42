//! Document, topic and status endpoint handlers.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::error::{json_response, ApiError};
use super::state::AppState;
use crate::content::{convert_to_html, DocumentName};

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Result<Response, ApiError> {
    json_response(StatusCode::OK, &HealthResponse { status: "ok" })
}

// =============================================================================
// Documents
// =============================================================================

#[derive(Serialize)]
pub struct TopicsResponse<'a> {
    pub topics: &'a [String],
}

/// Lists the documentation topics the frontend can request.
pub async fn list_topics(State(state): State<AppState>) -> Result<Response, ApiError> {
    json_response(
        StatusCode::OK,
        &TopicsResponse {
            topics: &state.config.topics,
        },
    )
}

/// `?name=<document>` query.
#[derive(Debug, Default, Deserialize)]
pub struct DocQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// Unwrap the query, turning malformed query strings into a JSON 400.
fn doc_query(query: Result<Query<DocQuery>, QueryRejection>) -> Result<DocQuery, ApiError> {
    query.map(|Query(q)| q).map_err(|e| {
        warn!(error = %e, "doc_request_invalid_query");
        ApiError::Validation(format!("Invalid query string: {}", e.body_text()))
    })
}

/// Rendered document response.
#[derive(Serialize)]
pub struct DocResponse {
    pub html: String,
}

/// Fetches a document by name and returns its HTML wrapped in JSON.
pub async fn get_doc(
    State(state): State<AppState>,
    query: Result<Query<DocQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = doc_query(query)?;
    let raw = query.name.as_deref().unwrap_or_default();
    if raw.trim().is_empty() {
        warn!("doc_request_missing_name");
        return Err(ApiError::Validation("Missing document name".to_string()));
    }

    let html = render_document(&state, raw).await?;
    json_response(StatusCode::OK, &DocResponse { html })
}

/// Legacy endpoint returning raw HTML.
///
/// Serves `?name=` when given, otherwise the configured default document.
pub async fn legacy_doc(
    State(state): State<AppState>,
    query: Result<Query<DocQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let query = doc_query(query)?;
    let raw = query
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(state.config.default_document.as_str());

    render_document(&state, raw).await.map(Html)
}

/// Validate the identifier, fetch its Markdown and render it.
async fn render_document(state: &AppState, raw_name: &str) -> Result<String, ApiError> {
    let name = DocumentName::parse(raw_name).map_err(|e| {
        warn!(name = %raw_name, error = %e, "doc_request_invalid_name");
        ApiError::Validation(format!("Invalid document name: {}", e))
    })?;

    let markdown = state.fetcher.fetch_markdown(&name).await.map_err(|e| {
        error!(document = %name, error = %e, upstream_status = ?e.status(), "document_fetch_failed");
        ApiError::from(e)
    })?;

    let html = convert_to_html(&markdown);

    info!(
        document = %name,
        markdown_length = markdown.len(),
        html_length = html.len(),
        "document_rendered"
    );

    Ok(html)
}

// =============================================================================
// Last Update
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpdateResponse {
    pub last_update: DateTime<Utc>,
}

/// Returns when a tracked branch last received an accepted push.
pub async fn get_last_update(State(state): State<AppState>) -> Result<Response, ApiError> {
    let last_update = state.last_update.get().await;
    info!(last_update = %last_update.to_rfc3339(), "last_update_requested");
    json_response(StatusCode::OK, &LastUpdateResponse { last_update })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_update_response_shape() {
        let body = serde_json::to_value(LastUpdateResponse {
            last_update: DateTime::<Utc>::default(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "lastUpdate": "1970-01-01T00:00:00Z" })
        );
    }

    #[test]
    fn test_topics_response_shape() {
        let topics = vec!["python".to_string(), "java".to_string()];
        let body = serde_json::to_value(TopicsResponse { topics: &topics }).unwrap();
        assert_eq!(body, serde_json::json!({ "topics": ["python", "java"] }));
    }
}
