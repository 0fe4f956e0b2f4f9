//! Entity catalog abstraction and an in-memory implementation.

use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use crate::{
    entity::{Entity, EntityId},
    error::StoreError,
    query::EntityFilter,
    StoreResult,
};

/// Read access to the entity catalog.
pub trait Catalog: Send + Sync {
    /// Returns every entity matching `filter`, in the catalog's natural order.
    fn query(&self, filter: &EntityFilter) -> StoreResult<Vec<Arc<Entity>>>;
}

/// Catalog held in memory. Natural order is insertion order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entities: RwLock<Vec<Arc<Entity>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity, rejecting a second entity with the same canonical id.
    pub fn insert(&self, entity: Entity) -> StoreResult<()> {
        let mut entities = self.entities.write()?;
        if entities.iter().any(|existing| existing.id() == entity.id()) {
            return Err(StoreError::Catalog(format!(
                "entity {} already exists",
                entity.id()
            )));
        }
        trace!(id = %entity.id(), "adding entity to catalog");
        entities.push(Arc::new(entity));
        Ok(())
    }

    /// Applies `update` to the entity with canonical id `id`.
    pub fn update<F>(&self, id: &EntityId, update: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Entity),
    {
        let mut entities = self.entities.write()?;
        let slot = entities
            .iter_mut()
            .find(|entity| entity.id() == id)
            .ok_or_else(|| StoreError::Catalog(format!("entity {id} not found")))?;

        let mut entity = (**slot).clone();
        update(&mut entity);
        if entity.id() != id {
            return Err(StoreError::Catalog(format!(
                "update of {id} must not change its id"
            )));
        }
        *slot = Arc::new(entity);
        debug!(%id, "updated catalog entity");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entities
            .read()
            .map(|entities| entities.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Catalog for MemoryCatalog {
    fn query(&self, filter: &EntityFilter) -> StoreResult<Vec<Arc<Entity>>> {
        let entities = self.entities.read()?;
        Ok(entities
            .iter()
            .filter(|entity| filter.matches(entity))
            .cloned()
            .collect())
    }
}
