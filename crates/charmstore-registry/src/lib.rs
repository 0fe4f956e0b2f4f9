//! Catalog snapshot loading for the charmstore listing engine.
//!
//! A snapshot is a JSON document of the form `{"entities": [...]}`, stored
//! either as plain JSON or zstd-compressed. Each entry is a
//! [`RemoteEntity`], which is validated and converted into a catalog
//! [`Entity`](charmstore_core::entity::Entity).
//!
//! # Example
//!
//! ```no_run
//! use charmstore_core::{catalog::Catalog, query::EntityFilter};
//! use charmstore_registry::load_catalog;
//!
//! fn count_entities() -> charmstore_registry::Result<usize> {
//!     let catalog = load_catalog("/srv/charmstore/catalog.json.zst")?;
//!     Ok(catalog.query(&EntityFilter::default())?.len())
//! }
//! ```

pub mod entity;
pub mod error;
pub mod snapshot;

pub use entity::RemoteEntity;
pub use error::{ErrorContext, RegistryError, Result};
pub use snapshot::{build_catalog, load_catalog, parse_snapshot, Snapshot, ZST_MAGIC_BYTES};
