mod acl;
mod id;
mod sources;

use std::{fmt, str::FromStr};

pub use acl::*;
pub use id::*;
use serde::{Deserialize, Serialize};
pub use sources::*;

use crate::{constants::BUNDLE_SERIES, error::StoreError, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Charm,
    Bundle,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Charm => "charm",
            EntityKind::Bundle => "bundle",
        }
    }

    /// Kind implied by a series name.
    pub fn for_series(series: &str) -> Self {
        if series == BUNDLE_SERIES {
            EntityKind::Bundle
        } else {
            EntityKind::Charm
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "charm" => Ok(EntityKind::Charm),
            "bundle" => Ok(EntityKind::Bundle),
            other => {
                Err(StoreError::InvalidQuery(format!(
                    "invalid entity type {other:?}, expected charm or bundle"
                )))
            }
        }
    }
}

/// The (owner, name, series) triple shared by every revision of a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseIdentity {
    pub owner: String,
    pub name: String,
    pub series: String,
}

impl fmt::Display for BaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cs:~{}/{}/{}", self.owner, self.series, self.name)
    }
}

/// Handle to the archive holding an entity's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    pub name: String,
    /// Lowercase hex blake3 digest of the archive.
    pub hash: String,
    pub size: u64,
}

/// One revision of a charm or bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    pub kind: EntityKind,
    pub promulgated: bool,
    pub acl: Acl,
    pub blob: BlobRef,
    pub sources: RawMetadataSources,
}

impl Entity {
    /// Creates an entity from its canonical id, which must carry an owner.
    ///
    /// The kind is derived from the series and may be overridden afterwards.
    pub fn new(id: EntityId, blob: BlobRef) -> StoreResult<Self> {
        if id.owner.is_none() {
            return Err(StoreError::InvalidEntityId(id.to_string()));
        }

        Ok(Self {
            kind: EntityKind::for_series(&id.series),
            id,
            promulgated: false,
            acl: Acl::default(),
            blob,
            sources: RawMetadataSources::default(),
        })
    }

    pub fn with_promulgated(mut self, promulgated: bool) -> Self {
        self.promulgated = promulgated;
        self
    }

    pub fn with_acl(mut self, acl: Acl) -> Self {
        self.acl = acl;
        self
    }

    pub fn with_sources(mut self, sources: RawMetadataSources) -> Self {
        self.sources = sources;
        self
    }

    /// Canonical id, always including the owner.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn owner(&self) -> &str {
        self.id.owner.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        &self.id.name
    }

    pub fn series(&self) -> &str {
        &self.id.series
    }

    pub fn revision(&self) -> u32 {
        self.id.revision
    }

    pub fn base_identity(&self) -> BaseIdentity {
        BaseIdentity {
            owner: self.owner().to_string(),
            name: self.id.name.clone(),
            series: self.id.series.clone(),
        }
    }

    /// Id shown to users: promulgated entities drop their owner.
    pub fn preferred_id(&self) -> EntityId {
        if self.promulgated {
            self.id.without_owner()
        } else {
            self.id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> BlobRef {
        BlobRef {
            name: "blob".to_string(),
            hash: "00".to_string(),
            size: 0,
        }
    }

    #[test]
    fn test_entity_requires_owner() {
        let id = EntityId::new(None, "trusty", "mysql", 7);
        assert!(matches!(
            Entity::new(id, blob()),
            Err(StoreError::InvalidEntityId(_))
        ));
    }

    #[test]
    fn test_kind_from_series() {
        let bundle = Entity::new(
            "cs:~charmers/bundle/wordpress-simple-4".parse().unwrap(),
            blob(),
        )
        .unwrap();
        assert_eq!(bundle.kind, EntityKind::Bundle);

        let charm = Entity::new("cs:~foo/trusty/varnish-1".parse().unwrap(), blob()).unwrap();
        assert_eq!(charm.kind, EntityKind::Charm);
    }

    #[test]
    fn test_preferred_id() {
        let id: EntityId = "cs:~openstack-charmers/trusty/mysql-7".parse().unwrap();
        let entity = Entity::new(id.clone(), blob()).unwrap();
        assert_eq!(entity.preferred_id(), id);

        let entity = entity.with_promulgated(true);
        assert_eq!(entity.preferred_id().to_string(), "cs:trusty/mysql-7");
        assert_eq!(entity.id(), &id);
    }

    #[test]
    fn test_base_identity_ignores_revision() {
        let a = Entity::new("cs:~charmers/precise/wordpress-23".parse().unwrap(), blob()).unwrap();
        let b = Entity::new("cs:~charmers/precise/wordpress-24".parse().unwrap(), blob()).unwrap();
        assert_eq!(a.base_identity(), b.base_identity());
        assert_eq!(
            a.base_identity().to_string(),
            "cs:~charmers/precise/wordpress"
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("bundle".parse::<EntityKind>().unwrap(), EntityKind::Bundle);
        assert!(matches!(
            "service".parse::<EntityKind>(),
            Err(StoreError::InvalidQuery(_))
        ));
    }
}
