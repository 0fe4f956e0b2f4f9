//! Archive blob storage.

use std::{
    collections::HashMap,
    fs::File,
    io::{Cursor, Read},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};

use charmstore_utils::hash::{checksum_bytes, verify_bytes};
use miette::Diagnostic;
use thiserror::Error;
use tracing::trace;

use crate::entity::BlobRef;

#[derive(Error, Diagnostic, Debug)]
pub enum BlobError {
    #[error("blob {0:?} not found")]
    #[diagnostic(code(charmstore::blob::not_found))]
    NotFound(String),

    #[error("hash mismatch: expected {expected}, got {actual}")]
    #[diagnostic(
        code(charmstore::blob::hash_mismatch),
        help("The archive does not match the catalog entry")
    )]
    HashMismatch { expected: String, actual: String },

    #[error("size mismatch: expected {expected} bytes, read {actual}")]
    #[diagnostic(
        code(charmstore::blob::size_mismatch),
        help("The archive does not match the catalog entry")
    )]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("invalid blob name {0:?}")]
    #[diagnostic(code(charmstore::blob::invalid_name))]
    InvalidName(String),

    #[error("cannot read blob: {0}")]
    #[diagnostic(code(charmstore::blob::io))]
    Io(#[from] std::io::Error),
}

/// Source of archive content.
pub trait BlobStore: Send + Sync {
    fn open(&self, blob: &BlobRef) -> Result<Box<dyn Read + Send>, BlobError>;
}

/// Reads a blob in full and checks it against the hash and size in `blob`.
///
/// The recorded size comes from the catalog and is only compared after the
/// read, never used to size buffers.
pub fn open_verified(store: &dyn BlobStore, blob: &BlobRef) -> Result<Vec<u8>, BlobError> {
    let mut reader = store.open(blob)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    if !verify_bytes(&data, &blob.hash) {
        return Err(BlobError::HashMismatch {
            expected: blob.hash.clone(),
            actual: checksum_bytes(&data),
        });
    }
    if data.len() as u64 != blob.size {
        return Err(BlobError::SizeMismatch {
            expected: blob.size,
            actual: data.len() as u64,
        });
    }

    trace!(blob = %blob.name, size = data.len(), "verified blob");
    Ok(data)
}

/// Blob store backed by a map, for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `name`, returning a reference carrying its hash.
    pub fn insert(&self, name: &str, data: Vec<u8>) -> BlobRef {
        let blob = BlobRef {
            name: name.to_string(),
            hash: checksum_bytes(&data),
            size: data.len() as u64,
        };
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), data);
        blob
    }

    pub fn remove(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }
}

impl BlobStore for MemoryBlobStore {
    fn open(&self, blob: &BlobRef) -> Result<Box<dyn Read + Send>, BlobError> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        let data = blobs
            .get(&blob.name)
            .ok_or_else(|| BlobError::NotFound(blob.name.clone()))?;
        Ok(Box::new(Cursor::new(data.clone())))
    }
}

/// Blob store serving one file per blob name from a directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, BlobError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);
        if !valid {
            return Err(BlobError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

impl BlobStore for FsBlobStore {
    fn open(&self, blob: &BlobRef) -> Result<Box<dyn Read + Send>, BlobError> {
        let path = self.blob_path(&blob.name)?;
        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(blob.name.clone()))
            }
            Err(err) => Err(BlobError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryBlobStore::new();
        let blob = store.insert("mysql-7", b"archive bytes".to_vec());
        assert_eq!(blob.size, 13);

        let data = open_verified(&store, &blob).unwrap();
        assert_eq!(data, b"archive bytes");
    }

    #[test]
    fn test_missing_blob() {
        let store = MemoryBlobStore::new();
        let blob = store.insert("gone", vec![1, 2, 3]);
        store.remove("gone");

        let err = open_verified(&store, &blob).unwrap_err();
        assert!(matches!(err, BlobError::NotFound(ref name) if name == "gone"));
    }

    #[test]
    fn test_hash_mismatch() {
        let store = MemoryBlobStore::new();
        let mut blob = store.insert("wordpress-23", b"content".to_vec());
        blob.hash = checksum_bytes(b"nope");

        let err = open_verified(&store, &blob).unwrap_err();
        match err {
            BlobError::HashMismatch {
                expected,
                actual,
            } => {
                assert_eq!(expected, checksum_bytes(b"nope"));
                assert_eq!(actual, checksum_bytes(b"content"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_size_mismatch() {
        let store = MemoryBlobStore::new();
        let mut blob = store.insert("mysql-7", b"archive bytes".to_vec());
        blob.size = u64::MAX;

        let err = open_verified(&store, &blob).unwrap_err();
        assert!(matches!(
            err,
            BlobError::SizeMismatch {
                expected: u64::MAX,
                actual: 13,
            }
        ));
    }

    #[test]
    fn test_fs_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("varnish-1"), b"varnish").unwrap();
        let store = FsBlobStore::new(dir.path());

        let blob = BlobRef {
            name: "varnish-1".to_string(),
            hash: checksum_bytes(b"varnish"),
            size: 7,
        };
        assert_eq!(open_verified(&store, &blob).unwrap(), b"varnish");

        let missing = BlobRef {
            name: "riak-67".to_string(),
            ..blob.clone()
        };
        assert!(matches!(
            open_verified(&store, &missing),
            Err(BlobError::NotFound(_))
        ));

        let escaping = BlobRef {
            name: "../varnish-1".to_string(),
            ..blob
        };
        assert!(matches!(
            open_verified(&store, &escaping),
            Err(BlobError::InvalidName(_))
        ));
    }
}
