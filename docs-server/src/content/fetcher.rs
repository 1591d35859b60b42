//! Raw Markdown retrieval from the remote content repository.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use super::DocumentName;

/// Placeholder substituted with the document name in the URL template.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url:?} for document {name}: {source}")]
    InvalidUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request for document {name} failed: {source}")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned status {status} for document {name}")]
    Status { status: u16, name: String },
}

impl FetchError {
    /// Upstream HTTP status, if the remote host answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fetches raw Markdown documents over HTTP.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct MarkdownFetcher {
    client: Client,
    url_template: String,
}

impl MarkdownFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docs-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, url_template))
    }

    pub fn with_client(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    /// Resolve the remote URL for a document.
    pub fn document_url(&self, name: &DocumentName) -> Result<Url, FetchError> {
        let url = self.url_template.replace(NAME_PLACEHOLDER, name.as_str());
        Url::parse(&url).map_err(|source| FetchError::InvalidUrl {
            name: name.to_string(),
            url,
            source,
        })
    }

    /// Fetch the Markdown text of a document.
    ///
    /// Any non-2xx status is an error rather than an empty body. No retries.
    pub async fn fetch_markdown(&self, name: &DocumentName) -> Result<String, FetchError> {
        let url = self.document_url(name)?;

        info!(document = %name, url = %url, "document_fetch_starting");

        let transport = |source: reqwest::Error| FetchError::Transport {
            name: name.to_string(),
            source,
        };

        let resp = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                error!(document = %name, url = %url, error = %e, "document_fetch_timeout");
            } else {
                error!(document = %name, url = %url, error = %e, "document_fetch_error");
            }
            transport(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(
                document = %name,
                url = %url,
                status_code = status.as_u16(),
                "document_fetch_bad_status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                name: name.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| {
            error!(document = %name, error = %e, "document_fetch_body_error");
            transport(e)
        })?;

        info!(
            document = %name,
            status_code = status.as_u16(),
            body_length = body.len(),
            "document_fetch_complete"
        );

        Ok(body)
    }
}
