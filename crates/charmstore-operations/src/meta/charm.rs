//! Charm documents.

use charmstore_core::entity::{Entity, EntityKind};
use serde_json::Value;

use super::{
    context::ProviderContext,
    error::{ProviderError, ProviderResult},
    registry::ProviderRegistry,
};

pub(crate) fn register(registry: &mut ProviderRegistry) {
    registry.register("charm-metadata", charm_metadata);
    registry.register("charm-config", charm_config);
    registry.register("charm-actions", charm_actions);
}

fn missing(entity: &Entity, source_name: &'static str) -> ProviderError {
    ProviderError::MissingSource {
        source_name,
        id: entity.preferred_id().to_string(),
    }
}

fn charm_metadata(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    if entity.kind != EntityKind::Charm {
        return Ok(None);
    }
    let meta = entity
        .sources
        .charm_meta
        .as_ref()
        .ok_or_else(|| missing(entity, "charm metadata"))?;

    serde_json::to_value(meta)
        .map(Some)
        .map_err(|source| {
            ProviderError::Encode {
                field: "charm-metadata",
                source,
            }
        })
}

fn charm_config(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    if entity.kind != EntityKind::Charm {
        return Ok(None);
    }
    entity
        .sources
        .charm_config
        .clone()
        .map(Some)
        .ok_or_else(|| missing(entity, "charm config"))
}

fn charm_actions(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    if entity.kind != EntityKind::Charm {
        return Ok(None);
    }
    entity
        .sources
        .charm_actions
        .clone()
        .map(Some)
        .ok_or_else(|| missing(entity, "charm actions"))
}
