use std::sync::{Arc, OnceLock};

use charmstore_core::{
    blob::{open_verified, BlobStore},
    catalog::Catalog,
    entity::Entity,
    identity::Identity,
};

use super::{
    error::{ProviderError, ProviderResult},
    related::RelatedIndex,
};

/// Request-scoped state shared by metadata providers.
pub struct ProviderContext {
    catalog: Arc<dyn Catalog>,
    blobs: Arc<dyn BlobStore>,
    identity: Identity,
    channel: String,
    related: OnceLock<Result<Arc<RelatedIndex>, String>>,
}

impl ProviderContext {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        identity: Identity,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            blobs,
            identity,
            channel: channel.into(),
            related: OnceLock::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Reads and verifies the archive of `entity`.
    pub fn archive(&self, entity: &Entity) -> ProviderResult<Vec<u8>> {
        open_verified(self.blobs.as_ref(), &entity.blob).map_err(|source| {
            ProviderError::Archive {
                id: entity.preferred_id().to_string(),
                source,
            }
        })
    }

    /// Relation index over every entity the requester can see, built on
    /// first use and shared for the rest of the request.
    pub fn related_index(&self) -> ProviderResult<Arc<RelatedIndex>> {
        self.related
            .get_or_init(|| {
                RelatedIndex::build(self.catalog.as_ref(), &self.identity, &self.channel)
                    .map(Arc::new)
                    .map_err(|err| err.to_string())
            })
            .clone()
            .map_err(ProviderError::Related)
    }
}
