//! Error types for charmstore-core.

use std::fmt;

use charmstore_config::error::ConfigError;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blob::BlobError;

/// Request-level error for listing operations.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("invalid query: {0}")]
    #[diagnostic(
        code(charmstore::invalid_query),
        help("Filters accept type=charm|bundle and promulgated=1|0")
    )]
    InvalidQuery(String),

    #[error("invalid sort field: unrecognized sort parameter \"{0}\"")]
    #[diagnostic(
        code(charmstore::invalid_sort_field),
        help("Sort by name, owner, series, type or revision, prefixing '-' for descending order")
    )]
    InvalidSortField(String),

    #[error("unrecognized metadata name \"{0}\"")]
    #[diagnostic(code(charmstore::unknown_metadata_field))]
    UnknownMetadataField(String),

    #[error("invalid entity id {0:?}")]
    #[diagnostic(
        code(charmstore::invalid_entity_id),
        help("Use the form cs:~owner/series/name-revision")
    )]
    InvalidEntityId(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Blob(#[from] BlobError),

    #[error("Catalog operation failed: {0}")]
    #[diagnostic(code(charmstore::catalog))]
    Catalog(String),

    #[error("Error while {action}")]
    #[diagnostic(code(charmstore::io), help("Check file permissions and paths"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(charmstore::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error("{0}")]
    #[diagnostic(code(charmstore::error))]
    Custom(String),
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidQuery(_)
            | Self::InvalidSortField(_)
            | Self::UnknownMetadataField(_)
            | Self::InvalidEntityId(_) => ErrorCode::BadRequest,
            Self::Blob(BlobError::NotFound(_)) => ErrorCode::NotFound,
            _ => ErrorCode::InternalServerError,
        }
    }

    pub fn status(&self) -> u16 {
        self.code().status()
    }

    /// Whether the error was raised while validating request parameters.
    pub fn is_validation(&self) -> bool {
        self.code() == ErrorCode::BadRequest
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

/// Error kind reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "bad request")]
    BadRequest,
    #[serde(rename = "not found")]
    NotFound,
    #[serde(rename = "internal server error")]
    InternalServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "bad request",
            ErrorCode::NotFound => "not found",
            ErrorCode::InternalServerError => "internal server error",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::BadRequest => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::InternalServerError => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialisable error object returned for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&StoreError> for ErrorResponse {
    fn from(err: &StoreError) -> Self {
        err.to_response()
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, StoreError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, StoreError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            StoreError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_sort_field_message() {
        let err = StoreError::InvalidSortField("text".to_string());
        assert_eq!(
            err.to_string(),
            "invalid sort field: unrecognized sort parameter \"text\""
        );
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(err.status(), 400);
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = StoreError::UnknownMetadataField("no-such".to_string());
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Code": "bad request",
                "Message": "unrecognized metadata name \"no-such\"",
            })
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            StoreError::Blob(BlobError::NotFound("x".into())).code(),
            ErrorCode::NotFound
        );
        let err = StoreError::Catalog("down".into());
        assert_eq!(err.status(), 500);
        assert!(!err.is_validation());
        assert_eq!(ErrorCode::InternalServerError.to_string(), "internal server error");
    }

    #[test]
    fn test_error_context() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = result
            .with_context(|| "reading catalog".to_string())
            .unwrap_err();
        assert_eq!(err.to_string(), "Error while reading catalog");
    }

    #[test]
    fn test_poison_error_conversion() {
        let lock = std::sync::Mutex::new(());
        let _ = std::panic::catch_unwind(|| {
            let _guard = lock.lock().unwrap();
            panic!("poison");
        });
        let err: StoreError = lock.lock().unwrap_err().into();
        assert!(matches!(err, StoreError::PoisonError));
    }
}
