//! Document retrieval and rendering.
//!
//! ```text
//! DocumentName → MarkdownFetcher::fetch_markdown() → convert_to_html() → HTML
//! ```

pub mod converter;
pub mod fetcher;

use std::fmt;

use thiserror::Error;

pub use converter::convert_to_html;
pub use fetcher::{FetchError, MarkdownFetcher};

/// Rejected document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDocumentName {
    #[error("document name is empty")]
    Empty,
    #[error("document name contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("document name must be a relative path without '..' segments")]
    Traversal,
}

/// Validated logical name of a document, e.g. `python` or `guides/setup`.
///
/// Only ASCII letters, digits, `-`, `_`, `.` and `/` are accepted, and the
/// name must stay below the content root once substituted into a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName(String);

impl DocumentName {
    pub fn parse(raw: &str) -> Result<Self, InvalidDocumentName> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(InvalidDocumentName::Empty);
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/')))
        {
            return Err(InvalidDocumentName::InvalidCharacter(c));
        }

        if name.starts_with('/') || name.split('/').any(|segment| segment == "..") {
            return Err(InvalidDocumentName::Traversal);
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
