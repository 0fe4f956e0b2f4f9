//! Metadata derived from an entity's archive.

use charmstore_core::{archive::read_manifest, entity::Entity};
use serde_json::{json, Value};

use super::{
    context::ProviderContext,
    error::{ProviderError, ProviderResult},
    registry::ProviderRegistry,
};

pub(crate) fn register(registry: &mut ProviderRegistry) {
    registry.register("archive-size", archive_size);
    registry.register("hash", hash);
    registry.register("manifest", manifest);
}

fn archive_size(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Size": entity.blob.size })))
}

fn hash(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Sum": entity.blob.hash })))
}

fn manifest(entity: &Entity, ctx: &ProviderContext) -> ProviderResult<Option<Value>> {
    let data = ctx.archive(entity)?;
    let files = read_manifest(data.as_slice()).map_err(|source| {
        ProviderError::Manifest {
            id: entity.preferred_id().to_string(),
            source,
        }
    })?;

    serde_json::to_value(files)
        .map(Some)
        .map_err(|source| {
            ProviderError::Encode {
                field: "manifest",
                source,
            }
        })
}
