use std::time::Duration;

use charmstore_core::blob::BlobError;
use miette::Diagnostic;
use thiserror::Error;

/// Failure to compute one metadata field for one entity.
///
/// These never reach the caller of a listing; the entity is dropped and the
/// failure is recorded instead.
#[derive(Error, Diagnostic, Debug)]
pub enum ProviderError {
    #[error("cannot open archive data for {id}: {source}")]
    #[diagnostic(code(charmstore_operations::archive))]
    Archive {
        id: String,
        #[source]
        source: BlobError,
    },

    #[error("cannot read archive manifest for {id}: {source}")]
    #[diagnostic(code(charmstore_operations::manifest))]
    Manifest {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no {source_name} data for {id}")]
    #[diagnostic(code(charmstore_operations::missing_source))]
    MissingSource {
        source_name: &'static str,
        id: String,
    },

    #[error("invalid placement {placement:?} for application {application:?}")]
    #[diagnostic(code(charmstore_operations::placement))]
    InvalidPlacement {
        application: String,
        placement: String,
    },

    #[error("cannot list related entities: {0}")]
    #[diagnostic(code(charmstore_operations::related))]
    Related(String),

    #[error("cannot encode {field}: {source}")]
    #[diagnostic(code(charmstore_operations::encode))]
    Encode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized metadata name {0:?}")]
    #[diagnostic(code(charmstore_operations::unknown_field))]
    UnknownField(String),

    #[error("metadata computation timed out after {0:?}")]
    #[diagnostic(code(charmstore_operations::timeout))]
    Timeout(Duration),

    #[error("metadata computation panicked: {0}")]
    #[diagnostic(code(charmstore_operations::panicked))]
    Panicked(String),

    #[error("{0}")]
    #[diagnostic(code(charmstore_operations::custom))]
    Custom(String),
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_message() {
        let err = ProviderError::Archive {
            id: "cs:precise/wordpress-23".to_string(),
            source: BlobError::NotFound("wordpress-23".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "cannot open archive data for cs:precise/wordpress-23: blob \"wordpress-23\" not found"
        );
    }

    #[test]
    fn test_timeout_message() {
        let err = ProviderError::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "metadata computation timed out after 50ms");
    }
}
