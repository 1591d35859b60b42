//! GitHub push webhook endpoint.
//!
//! For each delivery the handler:
//! 1. Rejects anything but POST
//! 2. Requires a configured secret and an `X-Hub-Signature-256` header
//! 3. Reads the raw body and verifies its HMAC-SHA256 signature
//! 4. Parses the push event and, for tracked refs, refreshes the last update time

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::error::{json_response, ApiError};
use super::signature::{verify_github_signature, SIGNATURE_HEADER};
use super::state::AppState;

/// Header naming the GitHub event type of a delivery.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// GitHub caps webhook payloads at 25 MB.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Push event fields this service looks at.
#[derive(Debug, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Head commit SHA after the push
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// Webhook response.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// GitHub webhook endpoint.
///
/// Mounted for every method so non-POST requests get the same logged 405.
pub async fn github_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    info!(method = %method, "webhook_received");

    if method != Method::POST {
        warn!(method = %method, "webhook_method_not_allowed");
        return Err(ApiError::MethodNotAllowed);
    }

    let Some(secret) = state.config.webhook_secret() else {
        error!("webhook_secret_not_configured");
        return Err(ApiError::MissingSecret);
    };

    let Some(signature) = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        warn!("webhook_signature_missing");
        return Err(ApiError::MissingSignature);
    };

    let body = to_bytes(body, MAX_WEBHOOK_BODY_BYTES).await.map_err(|e| {
        error!(error = %e, "webhook_body_read_failed");
        ApiError::BodyRead(e)
    })?;

    if !verify_github_signature(secret, &body, signature) {
        warn!(body_length = body.len(), "webhook_signature_invalid");
        return Err(ApiError::InvalidSignature);
    }

    let event_type = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok());
    if event_type == Some("ping") {
        info!("webhook_ping_received");
        return json_response(StatusCode::OK, &WebhookResponse { status: "ignored" });
    }

    let event: PushEvent = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "webhook_payload_invalid");
        ApiError::Validation("Failed to parse webhook payload".to_string())
    })?;

    info!(
        git_ref = %event.git_ref,
        event_type = ?event_type,
        after = ?event.after,
        repository = ?event.repository.as_ref().map(|r| r.full_name.as_str()),
        "webhook_push_event"
    );

    if state.config.is_tracked_ref(&event.git_ref) {
        let updated_at = state.last_update.touch().await;
        info!(
            git_ref = %event.git_ref,
            last_update = %updated_at.to_rfc3339(),
            "last_update_refreshed"
        );
        json_response(StatusCode::OK, &WebhookResponse { status: "success" })
    } else {
        info!(git_ref = %event.git_ref, "webhook_ref_ignored");
        json_response(StatusCode::OK, &WebhookResponse { status: "ignored" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_event_minimal() {
        let event: PushEvent = serde_json::from_str(r#"{"ref":"refs/heads/master"}"#).unwrap();
        assert_eq!(event.git_ref, "refs/heads/master");
        assert!(event.after.is_none());
        assert!(event.repository.is_none());
    }

    #[test]
    fn test_push_event_github_shape() {
        let event: PushEvent = serde_json::from_str(
            r#"{
                "ref": "refs/heads/navigation-bar-setup",
                "before": "0000000000000000000000000000000000000000",
                "after": "6113728f27ae82c7b1a177c8d03f9e96e0adf246",
                "repository": {"id": 1, "full_name": "octo/docs"},
                "commits": []
            }"#,
        )
        .unwrap();
        assert_eq!(event.git_ref, "refs/heads/navigation-bar-setup");
        assert_eq!(
            event.after.as_deref(),
            Some("6113728f27ae82c7b1a177c8d03f9e96e0adf246")
        );
        assert_eq!(event.repository.unwrap().full_name, "octo/docs");
    }

    #[test]
    fn test_push_event_missing_ref_rejected() {
        assert!(serde_json::from_str::<PushEvent>(r#"{"zen":"Keep it simple."}"#).is_err());
        assert!(serde_json::from_str::<PushEvent>(r#"{"ref": 42}"#).is_err());
        assert!(serde_json::from_str::<PushEvent>("not json").is_err());
    }
}
