//! Content negotiation for the file listing

use hyper::header::{HeaderMap, ACCEPT};

/// Representation chosen for `GET /`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// Browser directory index
    Html,
    /// JSON array of names
    Json,
    /// One name per line
    Text,
}

impl ListFormat {
    /// Pick a format from the first media range of `Accept`
    ///
    /// Parameters such as `;q=0.9` are ignored and matching is
    /// case-insensitive. Missing or unrecognised values fall back to text.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let first = accept
            .and_then(|value| value.split(',').next())
            .and_then(|range| range.split(';').next())
            .map(|media| media.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match first.as_str() {
            "text/html" => Self::Html,
            "application/json" | "text/json" => Self::Json,
            _ => Self::Text,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_accept(headers.get(ACCEPT).and_then(|v| v.to_str().ok()))
    }
}
