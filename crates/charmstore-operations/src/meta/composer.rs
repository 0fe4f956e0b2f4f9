use std::sync::Arc;

use charmstore_core::entity::Entity;
use tracing::trace;

use super::{
    context::ProviderContext,
    error::{ProviderError, ProviderResult},
    registry::ProviderRegistry,
};
use crate::MetaBag;

/// Computes the requested metadata fields of an entity.
#[derive(Clone)]
pub struct MetadataComposer {
    providers: Arc<ProviderRegistry>,
    ctx: Arc<ProviderContext>,
}

impl MetadataComposer {
    pub fn new(providers: Arc<ProviderRegistry>, ctx: Arc<ProviderContext>) -> Self {
        Self {
            providers,
            ctx,
        }
    }

    pub fn context(&self) -> &ProviderContext {
        &self.ctx
    }

    /// Runs the provider of every field in order. The first failing provider
    /// fails the whole entity; fields that do not apply to the entity's kind
    /// are left out.
    pub fn compose(&self, entity: &Entity, fields: &[String]) -> ProviderResult<MetaBag> {
        let mut meta = MetaBag::new();
        for field in fields {
            let provider = self
                .providers
                .get(field)
                .ok_or_else(|| ProviderError::UnknownField(field.clone()))?;

            match provider(entity, self.ctx.as_ref())? {
                Some(value) => {
                    meta.insert(field.clone(), value);
                }
                None => trace!(entity = %entity.id(), field = %field, "field does not apply"),
            }
        }
        Ok(meta)
    }
}
