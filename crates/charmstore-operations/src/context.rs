use std::sync::Arc;

use charmstore_config::config::Config;
use charmstore_core::{
    blob::BlobStore,
    catalog::Catalog,
    identity::Identity,
};
use charmstore_events::EventSinkHandle;
use tracing::debug;

use crate::meta::{MetadataComposer, ProviderContext, ProviderRegistry};

struct ListContextInner {
    config: Config,
    catalog: Arc<dyn Catalog>,
    blobs: Arc<dyn BlobStore>,
    events: EventSinkHandle,
    providers: Arc<ProviderRegistry>,
}

/// Shared state for serving listings. Cheap to clone.
#[derive(Clone)]
pub struct ListContext {
    inner: Arc<ListContextInner>,
}

impl ListContext {
    pub fn new(
        config: Config,
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        events: EventSinkHandle,
    ) -> Self {
        Self::with_providers(config, catalog, blobs, events, ProviderRegistry::new())
    }

    /// Context whose listings compute metadata with `providers` instead of
    /// the built-in set.
    pub fn with_providers(
        config: Config,
        catalog: Arc<dyn Catalog>,
        blobs: Arc<dyn BlobStore>,
        events: EventSinkHandle,
        providers: ProviderRegistry,
    ) -> Self {
        debug!(
            channel = %config.channel,
            providers = providers.len(),
            "creating list context"
        );
        Self {
            inner: Arc::new(ListContextInner {
                config,
                catalog,
                blobs,
                events,
                providers: Arc::new(providers),
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    #[inline]
    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.inner.catalog
    }

    #[inline]
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.inner.blobs
    }

    #[inline]
    pub fn events(&self) -> &EventSinkHandle {
        &self.inner.events
    }

    #[inline]
    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.inner.providers
    }

    /// Composer bound to a single request made by `identity`.
    pub fn composer(&self, identity: &Identity) -> MetadataComposer {
        let provider_ctx = ProviderContext::new(
            self.inner.catalog.clone(),
            self.inner.blobs.clone(),
            identity.clone(),
            self.inner.config.channel.as_str(),
        );
        MetadataComposer::new(self.inner.providers.clone(), Arc::new(provider_ctx))
    }
}
