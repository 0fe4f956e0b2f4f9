//! Reading catalog snapshot documents.

use std::{collections::HashSet, fs, io::Read, path::Path};

use charmstore_core::{catalog::MemoryCatalog, entity::Entity};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    entity::RemoteEntity,
    error::{ErrorContext, RegistryError, Result},
};

/// Magic bytes identifying zstd-compressed content.
pub const ZST_MAGIC_BYTES: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Top-level snapshot document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Snapshot {
    #[serde(default)]
    pub entities: Vec<RemoteEntity>,
}

/// Decodes snapshot content, decompressing it first when it starts with
/// [`ZST_MAGIC_BYTES`].
///
/// # Errors
///
/// Returns [`RegistryError`] if:
/// - Content is less than 4 bytes
/// - Zstd decompression fails
/// - JSON parsing fails
pub fn parse_snapshot(content: &[u8]) -> Result<Snapshot> {
    if content.len() < 4 {
        return Err(RegistryError::SnapshotTooShort);
    }

    if content[..4] == ZST_MAGIC_BYTES {
        let mut decoder = zstd::Decoder::new(content)
            .map_err(|e| RegistryError::Custom(format!("creating zstd decoder: {e}")))?;
        let mut decoded = Vec::new();
        decoder
            .read_to_end(&mut decoded)
            .with_context(|| "decoding zstd snapshot".to_string())?;
        debug!(
            compressed = content.len(),
            decoded = decoded.len(),
            "decompressed snapshot"
        );
        Ok(serde_json::from_slice(&decoded)?)
    } else {
        Ok(serde_json::from_slice(content)?)
    }
}

/// Converts snapshot records into a catalog, preserving their order.
///
/// Fails on the first record that is invalid or repeats an earlier
/// owner, series, name and revision.
pub fn build_catalog(entities: Vec<RemoteEntity>) -> Result<MemoryCatalog> {
    let catalog = MemoryCatalog::new();
    let mut seen = HashSet::with_capacity(entities.len());

    for remote in entities {
        let entity = Entity::try_from(remote)?;
        if !seen.insert(entity.id().clone()) {
            return Err(RegistryError::DuplicateEntity(entity.id().to_string()));
        }
        catalog.insert(entity)?;
    }

    Ok(catalog)
}

/// Reads a snapshot file into an in-memory catalog.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<MemoryCatalog> {
    let path = path.as_ref();
    let content =
        fs::read(path).with_context(|| format!("reading catalog snapshot {}", path.display()))?;

    let snapshot = parse_snapshot(&content)?;
    let catalog = build_catalog(snapshot.entities)?;
    info!(
        "Loaded {} entities from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
