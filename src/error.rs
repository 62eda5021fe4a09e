//! Error types
//!
//! `StorageError` covers filesystem access under the storage root,
//! `RequestError` is what a handler turns into an HTTP status.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

/// Errors raised by [`crate::storage::Storage`]
#[derive(Debug, Error)]
pub enum StorageError {
    /// Name would leave the storage root or is not a plain file name
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Request failure, one variant per response class
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    /// Carries the `Allow` header value
    #[error("method not allowed")]
    MethodNotAllowed(&'static str),

    #[error("{0}")]
    Internal(String),
}

impl RequestError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::BadRequest(message) => http::build_error_response(StatusCode::BAD_REQUEST, &message),
            Self::NotFound => http::build_404_response(),
            Self::MethodNotAllowed(allow) => http::build_405_response(allow),
            Self::Internal(message) => {
                http::build_error_response(StatusCode::INTERNAL_SERVER_ERROR, &message)
            }
        }
    }
}

impl From<StorageError> for RequestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(_) => Self::BadRequest(err.to_string()),
            StorageError::NotFound(_) => Self::NotFound,
            StorageError::Io { .. } => Self::Internal(err.to_string()),
        }
    }
}
