use std::{any::Any, sync::Arc};

use charmstore_core::{
    access::filter_visible,
    entity::Entity,
    error::StoreError,
    identity::Identity,
    query::{resolve_latest, ListQuery},
    sort::sort_entities,
    StoreResult,
};
use charmstore_events::{ListStage, OperationId, StoreEvent};
use tokio::{sync::Semaphore, task::JoinError};
use tracing::{debug, trace, warn};

use crate::{
    meta::{ProviderError, ProviderResult},
    progress::next_op_id,
    EntityResult, ListContext, ListResponse, MetaBag,
};

/// Lists entities for a raw URL query string such as
/// `type=charm&sort=-name&include=archive-size`.
pub async fn list_entities(
    ctx: &ListContext,
    identity: &Identity,
    query: &str,
) -> StoreResult<ListResponse> {
    let query = ListQuery::from_query_str(query)?;
    list(ctx, identity, query).await
}

/// Serves a parsed list request on behalf of `identity`.
///
/// Requested metadata names are validated before the catalog is read.
/// Entities whose metadata cannot be computed are left out of the response
/// and reported to the context's event sink.
pub async fn list(
    ctx: &ListContext,
    identity: &Identity,
    query: ListQuery,
) -> StoreResult<ListResponse> {
    ctx.providers().validate(&query.include)?;

    let op_id = next_op_id();
    debug!(
        op_id,
        filter = ?query.filter,
        sort = ?query.sort,
        include = ?query.include,
        "listing entities"
    );
    let events = ctx.events();
    events.emit(StoreEvent::ListStarted {
        op_id,
    });
    emit_stage(ctx, op_id, ListStage::Querying);

    let entities = ctx.catalog().query(&query.filter)?;
    let matched = entities.len();

    let visible = filter_visible(entities, identity, &ctx.config().channel);
    emit_stage(
        ctx,
        op_id,
        ListStage::Filtered {
            visible: visible.len(),
        },
    );

    let latest = resolve_latest(visible);
    emit_stage(
        ctx,
        op_id,
        ListStage::Resolved {
            latest: latest.len(),
        },
    );

    let sorted = sort_entities(latest, &query.sort);
    emit_stage(ctx, op_id, ListStage::Sorted);
    trace!(op_id, matched, listed = sorted.len(), "catalog stages done");

    let outcomes: Vec<(Arc<Entity>, ProviderResult<MetaBag>)> = if query.include.is_empty() {
        sorted
            .into_iter()
            .map(|entity| (entity, Ok(MetaBag::new())))
            .collect()
    } else {
        emit_stage(
            ctx,
            op_id,
            ListStage::Composing {
                total: sorted.len(),
            },
        );
        compose_all(ctx, identity, sorted, query.include).await?
    };

    let mut results = Vec::with_capacity(outcomes.len());
    let mut dropped = 0;
    for (entity, outcome) in outcomes {
        let id = entity.preferred_id();
        match outcome {
            Ok(meta) => {
                results.push(EntityResult {
                    id,
                    meta,
                })
            }
            Err(err) => {
                dropped += 1;
                warn!(op_id, entity = %id, error = %err, "cannot retrieve metadata");
                events.emit(StoreEvent::MetadataFailure {
                    op_id,
                    entity_id: id.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    debug!(op_id, returned = results.len(), dropped, "listing complete");
    events.emit(StoreEvent::ListComplete {
        op_id,
        returned: results.len(),
        dropped,
    });

    Ok(ListResponse {
        results,
    })
}

fn emit_stage(ctx: &ListContext, op_id: OperationId, stage: ListStage) {
    ctx.events().emit(StoreEvent::ListStage {
        op_id,
        stage,
    });
}

/// Composes metadata for every entity on a bounded pool of blocking tasks.
///
/// Outcomes are returned in input order.
async fn compose_all(
    ctx: &ListContext,
    identity: &Identity,
    entities: Vec<Arc<Entity>>,
    fields: Vec<String>,
) -> StoreResult<Vec<(Arc<Entity>, ProviderResult<MetaBag>)>> {
    let composer = ctx.composer(identity);
    let fields = Arc::new(fields);
    let timeout = ctx.config().get_metadata_timeout();
    let workers = ctx.config().composition_workers();
    let semaphore = Arc::new(Semaphore::new(workers));
    trace!(workers, ?timeout, total = entities.len(), "composing metadata");

    let mut handles = Vec::with_capacity(entities.len());
    for entity in entities {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|err| StoreError::Custom(format!("Composition pool closed: {err}")))?;
        let composer = composer.clone();
        let fields = fields.clone();
        let target = entity.clone();

        let handle = tokio::spawn(async move {
            let work = tokio::task::spawn_blocking(move || composer.compose(&target, &fields));
            let outcome = match tokio::time::timeout(timeout, work).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(err)) => Err(join_failure(err)),
                Err(_) => Err(ProviderError::Timeout(timeout)),
            };
            drop(permit);
            outcome
        });
        handles.push((entity, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (entity, handle) in handles {
        let outcome = handle
            .await
            .map_err(|err| StoreError::Custom(format!("Join handle error: {err}")))?;
        outcomes.push((entity, outcome));
    }
    Ok(outcomes)
}

fn join_failure(err: JoinError) -> ProviderError {
    if err.is_panic() {
        ProviderError::Panicked(panic_message(err.into_panic()))
    } else {
        ProviderError::Custom(format!("metadata computation cancelled: {err}"))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
