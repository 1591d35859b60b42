//! HTTP surface of the docs server.
//!
//! - Document endpoints fetch Markdown upstream and render it per request
//! - The GitHub webhook verifies signatures and records tracked pushes
//! - `/api/last-update` lets the frontend poll for upstream changes

pub mod error;
pub mod handlers;
pub mod routes;
pub mod signature;
pub mod state;
pub mod webhook;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{
    get_doc, get_last_update, health, legacy_doc, list_topics, DocQuery, DocResponse,
    HealthResponse, LastUpdateResponse, TopicsResponse,
};
pub use routes::build_router;
pub use signature::{sign_payload, verify_github_signature, SIGNATURE_HEADER, SIGNATURE_PREFIX};
pub use state::{AppState, LastUpdate};
pub use webhook::{github_webhook, PushEvent, WebhookResponse, EVENT_HEADER};
