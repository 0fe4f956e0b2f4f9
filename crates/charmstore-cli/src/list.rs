use charmstore_core::{error::StoreError, identity::Identity, StoreResult};
use charmstore_operations::{list::list_entities, ListContext, ListResponse};
use charmstore_utils::bytes::format_bytes;
use nu_ansi_term::Color::{Blue, Cyan, Green};
use tracing::{debug, info};

use crate::utils::Colored;

/// Who a listing is made for, from the command line flags.
pub fn identity_from_args(user: Option<String>, groups: Vec<String>, admin: bool) -> Identity {
    if admin {
        return Identity::Admin;
    }
    match user {
        Some(name) => Identity::user(name, groups),
        None => Identity::Anonymous,
    }
}

pub async fn list_catalog(
    ctx: &ListContext,
    identity: &Identity,
    query: &str,
    json: bool,
) -> StoreResult<()> {
    debug!(query, identity = ?identity, "listing catalog");
    let response = list_entities(ctx, identity, query).await?;

    if json {
        let output = serde_json::to_string_pretty(&response)
            .map_err(|err| StoreError::Custom(format!("encoding list response: {err}")))?;
        println!("{output}");
        return Ok(());
    }

    print_response(&response);
    Ok(())
}

fn print_response(response: &ListResponse) {
    for result in &response.results {
        info!(id = %result.id, "{}", Colored(Blue, &result.id));
        for (field, value) in &result.meta {
            match value.get("Size").and_then(|size| size.as_u64()) {
                Some(size) if field == "archive-size" => {
                    info!("  {}: {}", Colored(Cyan, field), format_bytes(size, 2))
                }
                _ => info!("  {}: {}", Colored(Cyan, field), value),
            }
        }
    }

    info!(
        "{} {}",
        Colored(Green, response.len()),
        if response.len() == 1 {
            "entity"
        } else {
            "entities"
        }
    );
}
