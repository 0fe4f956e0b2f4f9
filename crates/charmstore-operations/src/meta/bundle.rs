//! Bundle documents and deployment counts.

use charmstore_core::entity::{BundleData, Entity, EntityKind};
use serde_json::{json, Value};

use super::{
    context::ProviderContext,
    error::{ProviderError, ProviderResult},
    registry::ProviderRegistry,
};

pub(crate) fn register(registry: &mut ProviderRegistry) {
    registry.register("bundle-metadata", bundle_metadata);
    registry.register("bundle-machine-count", bundle_machine_count);
    registry.register("bundle-unit-count", bundle_unit_count);
}

fn bundle_data(entity: &Entity) -> ProviderResult<Option<&BundleData>> {
    if entity.kind != EntityKind::Bundle {
        return Ok(None);
    }
    entity
        .sources
        .bundle_data
        .as_ref()
        .map(Some)
        .ok_or_else(|| {
            ProviderError::MissingSource {
                source_name: "bundle",
                id: entity.preferred_id().to_string(),
            }
        })
}

fn bundle_metadata(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    let Some(data) = bundle_data(entity)? else {
        return Ok(None);
    };
    serde_json::to_value(data)
        .map(Some)
        .map_err(|source| {
            ProviderError::Encode {
                field: "bundle-metadata",
                source,
            }
        })
}

fn bundle_machine_count(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    let Some(data) = bundle_data(entity)? else {
        return Ok(None);
    };
    Ok(Some(json!({ "Count": machine_count(data)? })))
}

fn bundle_unit_count(entity: &Entity, _: &ProviderContext) -> ProviderResult<Option<Value>> {
    let Some(data) = bundle_data(entity)? else {
        return Ok(None);
    };
    Ok(Some(json!({ "Count": unit_count(data) })))
}

/// Machine part of a unit placement such as `new`, `lxc:new`, `0` or
/// `lxc:mysql/1`.
fn placement_machine(placement: &str) -> Option<&str> {
    let machine = match placement.split_once(':') {
        Some((container, machine)) if !container.is_empty() => machine,
        Some(_) => return None,
        None => placement,
    };
    (!machine.is_empty()).then_some(machine)
}

/// Declared machines plus one for every unit placed on a new machine.
///
/// Units without a placement of their own reuse the application's last
/// placement, which defaults to `new`.
pub fn machine_count(data: &BundleData) -> ProviderResult<u64> {
    let mut count = data.machines.len() as u64;

    for (application, spec) in &data.applications {
        let mut on_new_machine = true;
        for placement in &spec.to {
            let machine = placement_machine(placement).ok_or_else(|| {
                ProviderError::InvalidPlacement {
                    application: application.clone(),
                    placement: placement.clone(),
                }
            })?;
            on_new_machine = machine == "new";
            if on_new_machine {
                count += 1;
            }
        }

        if on_new_machine {
            count += u64::from(spec.num_units).saturating_sub(spec.to.len() as u64);
        }
    }

    Ok(count)
}

pub fn unit_count(data: &BundleData) -> u64 {
    data.applications
        .values()
        .map(|spec| u64::from(spec.num_units))
        .sum()
}
