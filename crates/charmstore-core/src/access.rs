//! Per-channel access control checks.

use std::sync::Arc;

use tracing::trace;

use crate::{
    entity::{Acl, Entity, Operation},
    identity::Identity,
};

/// Whether `identity` may perform `op` under `acl` on `channel`.
///
/// Access is granted when the channel places no restriction on the
/// operation, when the identity is administrative, or when the identity
/// holds any of the allowed groups.
pub fn is_permitted(acl: &Acl, identity: &Identity, channel: &str, op: Operation) -> bool {
    if identity.is_admin() {
        return true;
    }
    let allowed = acl.groups(channel, op);
    allowed.is_empty() || allowed.iter().any(|group| identity.member_of(group))
}

pub fn is_visible(entity: &Entity, identity: &Identity, channel: &str) -> bool {
    is_permitted(&entity.acl, identity, channel, Operation::Read)
}

/// Drops entities `identity` cannot read, keeping the order of the rest.
pub fn filter_visible(
    entities: Vec<Arc<Entity>>,
    identity: &Identity,
    channel: &str,
) -> Vec<Arc<Entity>> {
    let total = entities.len();
    let visible: Vec<_> = entities
        .into_iter()
        .filter(|entity| is_visible(entity, identity, channel))
        .collect();
    trace!(total, visible = visible.len(), channel, "applied read access control");
    visible
}
