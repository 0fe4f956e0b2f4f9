use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use charmstore_config::config::Config;
use charmstore_core::{
    blob::MemoryBlobStore,
    catalog::{Catalog, MemoryCatalog},
    entity::{
        Acl, ApplicationSpec, BlobRef, BundleData, CharmMeta, Entity, EntityId, Operation,
        RawMetadataSources, Relation,
    },
    identity::Identity,
    query::EntityFilter,
    StoreResult,
};
use charmstore_events::CollectorSink;
use serde_json::json;

use crate::{
    meta::{ProviderContext, ProviderRegistry},
    ListContext,
};

/// Entity with a placeholder blob that is not present in any store.
pub fn entity(id: &str, promulgated: bool) -> Entity {
    let blob = BlobRef {
        name: blob_name(id),
        hash: "0".repeat(64),
        size: 0,
    };
    entity_with_blob(id, promulgated, blob)
}

pub fn entity_with_blob(id: &str, promulgated: bool, blob: BlobRef) -> Entity {
    let id: EntityId = id.parse().unwrap();
    Entity::new(id, blob).unwrap().with_promulgated(promulgated)
}

/// Provider context over an empty catalog and blob store.
pub fn provider_context() -> ProviderContext {
    ProviderContext::new(
        Arc::new(MemoryCatalog::new()),
        Arc::new(MemoryBlobStore::new()),
        Identity::Anonymous,
        "stable",
    )
}

pub fn tar_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *content).unwrap();
    }
    builder.into_inner().unwrap()
}

fn blob_name(id: &str) -> String {
    id.trim_start_matches("cs:")
        .trim_start_matches('~')
        .replace('/', "-")
}

/// Two applications with one unit each and no declared machines.
pub fn wordpress_simple_data() -> BundleData {
    let mut data = BundleData {
        series: "precise".to_string(),
        relations: vec![vec!["wordpress:db".to_string(), "mysql:server".to_string()]],
        ..Default::default()
    };
    for (name, charm) in [("wordpress", "cs:wordpress"), ("mysql", "cs:mysql")] {
        data.applications.insert(
            name.to_string(),
            ApplicationSpec {
                charm: charm.to_string(),
                num_units: 1,
                ..Default::default()
            },
        );
    }
    data
}

pub fn charm_meta(
    name: &str,
    provides: &[(&str, &str)],
    requires: &[(&str, &str)],
) -> CharmMeta {
    let mut meta = CharmMeta {
        name: name.to_string(),
        summary: format!("{name} charm"),
        ..Default::default()
    };
    for (relation, interface) in provides {
        meta.provides
            .insert(relation.to_string(), Relation::new(*interface));
    }
    for (relation, interface) in requires {
        meta.requires
            .insert(relation.to_string(), Relation::new(*interface));
    }
    meta
}

pub fn wordpress_meta() -> CharmMeta {
    charm_meta(
        "wordpress",
        &[("url", "http")],
        &[("db", "mysql"), ("cache", "varnish")],
    )
}

fn charm_sources(meta: CharmMeta) -> RawMetadataSources {
    let name = meta.name.clone();
    RawMetadataSources {
        charm_meta: Some(meta),
        charm_config: Some(json!({
            "options": {"blog-title": {"type": "string", "default": name}}
        })),
        charm_actions: Some(json!({
            "actions": {"backup": {"description": "Back up the database"}}
        })),
        bundle_data: None,
    }
}

/// Catalog wrapper counting the queries it serves.
pub struct CountingCatalog {
    inner: Arc<MemoryCatalog>,
    queries: AtomicUsize,
}

impl CountingCatalog {
    pub fn new(inner: Arc<MemoryCatalog>) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Catalog for CountingCatalog {
    fn query(&self, filter: &EntityFilter) -> StoreResult<Vec<Arc<Entity>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(filter)
    }
}

/// Catalog of one bundle and four charms, each with a real archive.
///
/// riak can only be read by `charmers` and `test-user` on the stable channel.
pub struct Fixture {
    pub catalog: Arc<MemoryCatalog>,
    pub blobs: Arc<MemoryBlobStore>,
    pub events: Arc<CollectorSink>,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            catalog: Arc::new(MemoryCatalog::new()),
            blobs: Arc::new(MemoryBlobStore::new()),
            events: Arc::new(CollectorSink::default()),
        };

        fixture.add_bundle(
            "cs:~charmers/bundle/wordpress-simple-4",
            true,
            wordpress_simple_data(),
        );
        fixture.add_charm("cs:~charmers/precise/wordpress-23", true, wordpress_meta());
        fixture.add_charm(
            "cs:~foo/trusty/varnish-1",
            false,
            charm_meta("varnish", &[("webcache", "varnish")], &[]),
        );
        fixture.add_charm(
            "cs:~openstack-charmers/trusty/mysql-7",
            true,
            charm_meta("mysql", &[("server", "mysql")], &[]),
        );

        let mut riak = charm_meta("riak", &[("endpoint", "http")], &[("db", "mysql")]);
        riak.peers.insert("ring".to_string(), Relation::new("riak"));
        let riak = fixture
            .charm("cs:~charmers/trusty/riak-67", true, riak)
            .with_acl(Acl::new().with_groups(
                "stable",
                Operation::Read,
                ["charmers", "test-user"],
            ));
        fixture.catalog.insert(riak).unwrap();

        fixture
    }

    /// Builds a charm entity whose archive is stored in the fixture's blob
    /// store, without adding it to the catalog.
    pub fn charm(&self, id: &str, promulgated: bool, meta: CharmMeta) -> Entity {
        let archive = tar_archive(&[
            ("metadata.yaml", format!("name: {}\n", meta.name).as_bytes()),
            ("config.yaml", b"options: {}\n".as_slice()),
            ("hooks/install", b"#!/bin/sh\n".as_slice()),
        ]);
        let blob = self.blobs.insert(&blob_name(id), archive);
        entity_with_blob(id, promulgated, blob).with_sources(charm_sources(meta))
    }

    pub fn add_charm(&self, id: &str, promulgated: bool, meta: CharmMeta) {
        let charm = self.charm(id, promulgated, meta);
        self.catalog.insert(charm).unwrap();
    }

    pub fn add_bundle(&self, id: &str, promulgated: bool, data: BundleData) {
        let readme = b"A simple WordPress deployment.\n";
        let archive = tar_archive(&[
            ("bundle.yaml", b"applications: {}\n".as_slice()),
            ("README.md", readme.as_slice()),
        ]);
        let blob = self.blobs.insert(&blob_name(id), archive);
        let bundle = entity_with_blob(id, promulgated, blob).with_sources(RawMetadataSources {
            bundle_data: Some(data),
            ..Default::default()
        });
        self.catalog.insert(bundle).unwrap();
    }

    /// Catalog entry with canonical id `id`.
    pub fn entity(&self, id: &str) -> Entity {
        let id: EntityId = id.parse().unwrap();
        let entities = self.catalog.query(&EntityFilter::default()).unwrap();
        let found = entities
            .iter()
            .find(|entity| *entity.id() == id)
            .unwrap_or_else(|| panic!("no entity {id} in fixture"));
        Entity::clone(found)
    }

    pub fn provider_context(&self, identity: Identity) -> ProviderContext {
        ProviderContext::new(self.catalog.clone(), self.blobs.clone(), identity, "stable")
    }

    pub fn context(&self) -> ListContext {
        self.context_with_config(Config::default_config())
    }

    pub fn context_with_config(&self, config: Config) -> ListContext {
        ListContext::new(
            config,
            self.catalog.clone(),
            self.blobs.clone(),
            self.events.clone(),
        )
    }

    pub fn context_with_providers(&self, providers: ProviderRegistry) -> ListContext {
        ListContext::with_providers(
            Config::default_config(),
            self.catalog.clone(),
            self.blobs.clone(),
            self.events.clone(),
            providers,
        )
    }

    /// Context whose catalog counts the queries made through it.
    pub fn counting_context(&self) -> (ListContext, Arc<CountingCatalog>) {
        let counting = Arc::new(CountingCatalog::new(self.catalog.clone()));
        let ctx = ListContext::new(
            Config::default_config(),
            counting.clone(),
            self.blobs.clone(),
            self.events.clone(),
        );
        (ctx, counting)
    }
}
