//! Charms related through shared relation interfaces.

use std::collections::{BTreeMap, BTreeSet};

use charmstore_core::{
    access::filter_visible,
    catalog::Catalog,
    entity::{BaseIdentity, Entity, EntityKind},
    identity::Identity,
    query::{resolve_latest, EntityFilter},
    StoreResult,
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde_json::{json, Map, Value};
use tracing::trace;

use super::{
    context::ProviderContext,
    error::{ProviderError, ProviderResult},
    registry::ProviderRegistry,
};

pub(crate) fn register(registry: &mut ProviderRegistry) {
    registry.register("charm-related", charm_related);
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Endpoint {
    preferred_id: String,
    base: BaseIdentity,
}

/// Interface lookup over the latest visible revision of every charm.
#[derive(Debug, Default)]
pub struct RelatedIndex {
    providers: BTreeMap<String, BTreeSet<Endpoint>>,
    requirers: BTreeMap<String, BTreeSet<Endpoint>>,
}

impl RelatedIndex {
    /// Indexes every charm `identity` can read on `channel`, ignoring any
    /// request filters.
    pub fn build(catalog: &dyn Catalog, identity: &Identity, channel: &str) -> StoreResult<Self> {
        let entities = catalog.query(&EntityFilter {
            kind: Some(EntityKind::Charm),
            ..Default::default()
        })?;
        let latest = resolve_latest(filter_visible(entities, identity, channel));

        let endpoints: Vec<(Endpoint, Vec<String>, Vec<String>)> = latest
            .par_iter()
            .filter_map(|entity| {
                let meta = entity.sources.charm_meta.as_ref()?;
                let endpoint = Endpoint {
                    preferred_id: entity.preferred_id().to_string(),
                    base: entity.base_identity(),
                };
                Some((
                    endpoint,
                    meta.provided_interfaces().map(String::from).collect(),
                    meta.required_interfaces().map(String::from).collect(),
                ))
            })
            .collect();

        let mut index = RelatedIndex::default();
        for (endpoint, provides, requires) in endpoints {
            for interface in provides {
                index
                    .providers
                    .entry(interface)
                    .or_default()
                    .insert(endpoint.clone());
            }
            for interface in requires {
                index
                    .requirers
                    .entry(interface)
                    .or_default()
                    .insert(endpoint.clone());
            }
        }

        trace!(
            charms = latest.len(),
            interfaces = index.providers.len() + index.requirers.len(),
            "built relation index"
        );
        Ok(index)
    }

    /// Entities that provide each interface `entity` requires, and entities
    /// that require each interface it provides. The entity's own base
    /// identity is never listed.
    pub fn related_to(&self, entity: &Entity) -> Value {
        let Some(meta) = entity.sources.charm_meta.as_ref() else {
            return json!({});
        };
        let own = entity.base_identity();

        let mut related = Map::new();
        let provides = collect(&self.providers, meta.required_interfaces(), &own);
        if !provides.is_empty() {
            related.insert("Provides".into(), Value::Object(provides));
        }
        let requires = collect(&self.requirers, meta.provided_interfaces(), &own);
        if !requires.is_empty() {
            related.insert("Requires".into(), Value::Object(requires));
        }
        Value::Object(related)
    }
}

fn collect<'a>(
    table: &BTreeMap<String, BTreeSet<Endpoint>>,
    interfaces: impl Iterator<Item = &'a str>,
    own: &BaseIdentity,
) -> Map<String, Value> {
    let mut result = Map::new();
    for interface in interfaces.collect::<BTreeSet<_>>() {
        let Some(endpoints) = table.get(interface) else {
            continue;
        };
        let mut ids: Vec<&str> = endpoints
            .iter()
            .filter(|endpoint| &endpoint.base != own)
            .map(|endpoint| endpoint.preferred_id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            continue;
        }
        let entries = ids.into_iter().map(|id| json!({ "Id": id })).collect();
        result.insert(interface.to_string(), Value::Array(entries));
    }
    result
}

fn charm_related(entity: &Entity, ctx: &ProviderContext) -> ProviderResult<Option<Value>> {
    if entity.kind != EntityKind::Charm {
        return Ok(None);
    }
    if entity.sources.charm_meta.is_none() {
        return Err(ProviderError::MissingSource {
            source_name: "charm metadata",
            id: entity.preferred_id().to_string(),
        });
    }
    let index = ctx.related_index()?;
    Ok(Some(index.related_to(entity)))
}
