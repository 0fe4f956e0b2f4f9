//! Error types for the registry crate.

use charmstore_core::error::StoreError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while reading a catalog snapshot.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(charmstore_registry::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(charmstore_registry::json),
        help("The snapshot file may be corrupted or in an invalid format")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Snapshot content is too short")]
    #[diagnostic(
        code(charmstore_registry::snapshot_too_short),
        help("The snapshot file appears to be corrupted or incomplete")
    )]
    SnapshotTooShort,

    #[error("Entity {0} appears more than once in the snapshot")]
    #[diagnostic(
        code(charmstore_registry::duplicate_entity),
        help("Each owner, series, name and revision combination must be unique")
    )]
    DuplicateEntity(String),

    #[error("Entity id {0} has no owner")]
    #[diagnostic(
        code(charmstore_registry::missing_owner),
        help("Snapshot ids must be canonical, e.g. cs:~charmers/trusty/mysql-7")
    )]
    MissingOwner(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    #[diagnostic(code(charmstore_registry::custom))]
    Custom(String),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            RegistryError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
