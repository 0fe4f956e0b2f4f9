//! Identity and permission metadata.

use charmstore_core::{
    constants::EVERYONE,
    entity::{Entity, Operation},
};
use serde_json::{json, Map, Value};

use super::{context::ProviderContext, error::ProviderResult, registry::ProviderRegistry};

pub(crate) fn register(registry: &mut ProviderRegistry) {
    registry.register("id", id);
    registry.register("id-name", id_name);
    registry.register("id-user", id_user);
    registry.register("id-series", id_series);
    registry.register("id-revision", id_revision);
    registry.register("owner", owner);
    registry.register("promulgated", promulgated);
    registry.register("perm", perm);
}

fn id(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    let preferred = entity.preferred_id();
    let mut value = Map::new();
    value.insert("Id".into(), json!(preferred.to_string()));
    if let Some(user) = &preferred.owner {
        value.insert("User".into(), json!(user));
    }
    value.insert("Series".into(), json!(preferred.series));
    value.insert("Name".into(), json!(preferred.name));
    value.insert("Revision".into(), json!(preferred.revision));
    Ok(Some(Value::Object(value)))
}

fn id_name(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Name": entity.name() })))
}

/// Owner as it appears in the preferred id; empty for promulgated entities.
fn id_user(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    match entity.preferred_id().owner {
        Some(user) => Ok(Some(json!({ "User": user }))),
        None => Ok(Some(json!({}))),
    }
}

fn id_series(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Series": entity.series() })))
}

fn id_revision(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Revision": entity.revision() })))
}

fn owner(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "User": entity.owner() })))
}

fn promulgated(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    Ok(Some(json!({ "Promulgated": entity.promulgated })))
}

/// Groups allowed to read and write on the listing channel. An unrestricted
/// read list is reported as `everyone`.
fn perm(entity: &Entity, ctx: &ProviderContext) -> ProviderResult<Option<Value>> {
    let read = entity.acl.groups(ctx.channel(), Operation::Read);
    let read = if read.is_empty() {
        vec![EVERYONE.to_string()]
    } else {
        read.to_vec()
    };
    let write = entity.acl.groups(ctx.channel(), Operation::Write);
    Ok(Some(json!({ "Read": read, "Write": write })))
}
