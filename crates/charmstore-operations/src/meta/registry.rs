use std::{collections::BTreeMap, fmt, sync::Arc};

use charmstore_core::{entity::Entity, error::StoreError, StoreResult};
use serde_json::Value;

use super::{archive, bundle, charm, context::ProviderContext, error::ProviderResult, id, related};

/// Computes one metadata field for an entity.
///
/// `Ok(None)` means the field does not apply to the entity's kind; the
/// field is omitted and the entity kept.
pub type Provider = Arc<dyn Fn(&Entity, &ProviderContext) -> ProviderResult<Option<Value>> + Send + Sync>;

/// Table of metadata providers keyed by field name.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: BTreeMap<String, Provider>,
}

impl ProviderRegistry {
    /// Registry with no providers.
    pub fn empty() -> Self {
        Self {
            providers: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in provider.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        id::register(&mut registry);
        archive::register(&mut registry);
        charm::register(&mut registry);
        bundle::register(&mut registry);
        related::register(&mut registry);
        registry
    }

    /// Adds a provider, returning the one it replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, provider: F) -> Option<Provider>
    where
        F: Fn(&Entity, &ProviderContext) -> ProviderResult<Option<Value>> + Send + Sync + 'static,
    {
        self.providers.insert(name.into(), Arc::new(provider))
    }

    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Checks that every requested field has a provider.
    pub fn validate(&self, fields: &[String]) -> StoreResult<()> {
        match fields.iter().find(|field| !self.contains(field)) {
            Some(unknown) => Err(StoreError::UnknownMetadataField(unknown.clone())),
            None => Ok(()),
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
