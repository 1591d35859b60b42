//! Personal docs server.
//!
//! Fetches Markdown documents from a GitHub-hosted content repository,
//! renders them to HTML for the frontend, and records when tracked branches
//! receive pushes so the frontend knows to refresh.
//!
//! ## Architecture
//!
//! ```text
//! Frontend → Router → handlers → MarkdownFetcher → GitHub raw content
//!                              → convert_to_html
//! GitHub   → /api/webhook → signature check → LastUpdate
//! ```

pub mod config;
pub mod content;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use content::{convert_to_html, DocumentName, FetchError, MarkdownFetcher};
pub use web::{build_router, AppState, LastUpdate};
