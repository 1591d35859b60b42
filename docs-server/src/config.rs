//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup. Unset or unparsable values fall
//! back to the defaults in [`Config::default`].

use std::env;
use std::time::Duration;

use tracing::warn;

/// Default template for raw document URLs. `{name}` is replaced by the document identifier.
pub const DEFAULT_CONTENT_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/sam301100/personal-docs-content/master/{name}.md";

const DEFAULT_TOPICS: &[&str] = &[
    "new-joiner-guide",
    "python",
    "java",
    "react",
    "system-design",
];

const DEFAULT_TRACKED_BRANCHES: &[&str] = &["master", "navigation-bar-setup"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret GitHub uses to sign webhook deliveries
    pub webhook_secret: Option<String>,

    /// Remote document URL template containing a `{name}` placeholder
    pub content_url_template: String,

    /// Timeout for outbound document fetches in milliseconds
    pub fetch_timeout_ms: u64,

    /// Fully-qualified refs (`refs/heads/...`) whose pushes refresh the last update time
    pub tracked_refs: Vec<String>,

    /// Topics advertised to the frontend
    pub topics: Vec<String>,

    /// Document served by the legacy `/docs` endpoint when no name is given
    pub default_document: String,

    /// Frontend origins allowed by CORS
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            webhook_secret: None,
            content_url_template: DEFAULT_CONTENT_URL_TEMPLATE.to_string(),
            fetch_timeout_ms: 10_000,
            tracked_refs: normalize_refs(DEFAULT_TRACKED_BRANCHES.iter().copied()),
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            default_document: "new-joiner-guide".to_string(),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_number("PORT").unwrap_or(defaults.port),

            webhook_secret: env::var("GITHUB_WEBHOOK_SECRET").ok(),

            content_url_template: match env::var("CONTENT_URL_TEMPLATE") {
                Ok(template) if template.contains("{name}") => template,
                Ok(template) => {
                    warn!(
                        env_var = "CONTENT_URL_TEMPLATE",
                        value = %template,
                        "Template has no {{name}} placeholder, using default"
                    );
                    defaults.content_url_template
                }
                Err(_) => defaults.content_url_template,
            },

            fetch_timeout_ms: parse_number("FETCH_TIMEOUT_MS").unwrap_or(defaults.fetch_timeout_ms),

            tracked_refs: parse_csv("TRACKED_BRANCHES")
                .map(|branches| normalize_refs(branches.iter().map(String::as_str)))
                .unwrap_or(defaults.tracked_refs),

            topics: parse_csv("DOC_TOPICS").unwrap_or(defaults.topics),

            default_document: env::var("DEFAULT_DOCUMENT")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_document),

            cors_allowed_origins: parse_csv("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        }
    }

    /// The configured webhook secret, treating blank values as absent.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
    }

    /// Outbound fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Whether a push to `git_ref` should refresh the last update time.
    pub fn is_tracked_ref(&self, git_ref: &str) -> bool {
        self.tracked_refs.iter().any(|tracked| tracked == git_ref)
    }
}

/// Expand bare branch names to `refs/heads/<branch>`; full refs are kept as-is.
fn normalize_refs<'a>(branches: impl Iterator<Item = &'a str>) -> Vec<String> {
    branches
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| {
            if b.starts_with("refs/") {
                b.to_string()
            } else {
                format!("refs/heads/{}", b)
            }
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            None
        }
    }
}

/// Parse a comma-separated list of strings.
fn parse_csv(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
