//! Entity records as stored in a catalog snapshot.

use charmstore_core::entity::{Acl, BlobRef, Entity, EntityId, EntityKind, RawMetadataSources};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{RegistryError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexiBool {
    Bool(bool),
    Number(u64),
    String(String),
}

fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlexiBool>::deserialize(deserializer)? {
        Some(FlexiBool::Bool(b)) => Ok(Some(b)),
        Some(FlexiBool::Number(0)) => Ok(Some(false)),
        Some(FlexiBool::Number(1)) => Ok(Some(true)),
        Some(FlexiBool::Number(n)) => {
            Err(de::Error::invalid_value(
                de::Unexpected::Unsigned(n),
                &"0 or 1",
            ))
        }
        Some(FlexiBool::String(s)) => {
            match s.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                "" => Ok(None),
                _ => {
                    Err(de::Error::invalid_value(
                        de::Unexpected::Str(&s),
                        &"a valid boolean (true/false, yes/no, 1/0)",
                    ))
                }
            }
        }
        None => Ok(None),
    }
}

/// One entity as described by a snapshot document.
///
/// Raw metadata documents (`charm_meta`, `charm_config`, `charm_actions`,
/// `bundle_data`) sit at the top level of the record next to the identity
/// fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteEntity {
    /// Canonical id, including the owner.
    pub id: String,

    /// Entity kind; derived from the series when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntityKind>,

    #[serde(
        default,
        deserialize_with = "flexible_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub promulgated: Option<bool>,

    #[serde(default)]
    pub acl: Acl,

    pub blob: BlobRef,

    #[serde(flatten)]
    pub sources: RawMetadataSources,
}

impl TryFrom<RemoteEntity> for Entity {
    type Error = RegistryError;

    fn try_from(remote: RemoteEntity) -> Result<Self> {
        let id: EntityId = remote.id.parse()?;
        if id.owner.is_none() {
            return Err(RegistryError::MissingOwner(remote.id));
        }

        let mut entity = Entity::new(id, remote.blob)?
            .with_promulgated(remote.promulgated.unwrap_or(false))
            .with_acl(remote.acl)
            .with_sources(remote.sources);
        if let Some(kind) = remote.kind {
            entity.kind = kind;
        }

        Ok(entity)
    }
}
