//! Route table and middleware stack.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{any, get},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::handlers::{get_doc, get_last_update, health, legacy_doc, list_topics};
use super::state::AppState;
use super::webhook::github_webhook;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/docs", get(legacy_doc))
        .route("/api/topics", get(list_topics))
        .route("/api/docs", get(get_doc))
        .route("/api/webhook", any(github_webhook))
        .route("/api/last-update", get(get_last_update))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the frontend origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-hub-signature-256"),
        ])
        .allow_credentials(true)
}

/// Origins usable in an explicit allow-list. Unparsable origins are skipped,
/// and so is `*`: it cannot be listed and cannot be combined with credentials.
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| {
            if origin.trim() == "*" {
                warn!(origin = %origin, "cors_origin_wildcard_unsupported");
                return None;
            }
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(origin = %origin, error = %e, "cors_origin_invalid");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_allowed_origins_skips_wildcard() {
        let allowed = allowed_origins(&origins(&["*", "http://localhost:3000", " * "]));
        assert_eq!(allowed, vec![HeaderValue::from_static("http://localhost:3000")]);
    }

    #[test]
    fn test_allowed_origins_skips_unparsable() {
        let allowed = allowed_origins(&origins(&["http://ok.example", "bad\norigin"]));
        assert_eq!(allowed.len(), 1);
        assert_eq!(allowed[0], "http://ok.example");
    }

    #[test]
    fn test_cors_layer_with_wildcard_builds() {
        let _ = cors_layer(&origins(&["*", "http://localhost:3000"]));
        let _ = cors_layer(&origins(&["*"]));
    }
}
