//! Translation of list query parameters into catalog predicates.

use std::{collections::HashMap, sync::Arc};

use tracing::trace;
use url::form_urlencoded;

use crate::{
    entity::{BaseIdentity, Entity, EntityKind},
    error::StoreError,
    sort::{parse_sort_keys, SortKey},
    StoreResult,
};

/// Exact-match predicate over catalog entities. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilter {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub series: Option<String>,
    pub kind: Option<EntityKind>,
    pub promulgated: Option<bool>,
}

impl EntityFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        self.name.as_deref().is_none_or(|name| entity.name() == name)
            && self
                .owner
                .as_deref()
                .is_none_or(|owner| entity.owner() == owner)
            && self
                .series
                .as_deref()
                .is_none_or(|series| entity.series() == series)
            && self.kind.is_none_or(|kind| entity.kind == kind)
            && self
                .promulgated
                .is_none_or(|promulgated| entity.promulgated == promulgated)
    }
}

/// Parsed list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: EntityFilter,
    pub sort: Vec<SortKey>,
    /// Requested metadata field names, deduplicated in request order.
    pub include: Vec<String>,
}

impl ListQuery {
    /// Parses a URL query string such as `type=charm&sort=-name&include=hash`.
    pub fn from_query_str(query: &str) -> StoreResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self::from_params(&params)
    }

    /// Builds a query from decoded key/value pairs.
    ///
    /// Repeated filter keys keep their first value and empty filter values
    /// are treated as absent. `sort` and `include` accumulate across
    /// occurrences. `descending=1` marks every sort key descending.
    /// Unrecognized keys are ignored.
    pub fn from_params<K, V>(params: &[(K, V)]) -> StoreResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ListQuery::default();
        let mut descending = false;
        let mut seen: Vec<&str> = Vec::new();

        for (key, value) in params {
            let key = key.as_ref();
            let value = value.as_ref().trim();

            match key {
                "sort" => query.sort.extend(parse_sort_keys(value)?),
                "include" => {
                    if !value.is_empty() && !query.include.iter().any(|f| f == value) {
                        query.include.push(value.to_string());
                    }
                }
                "name" | "owner" | "series" | "type" | "promulgated" | "descending" => {
                    if value.is_empty() || seen.contains(&key) {
                        continue;
                    }
                    seen.push(key);

                    let filter = &mut query.filter;
                    match key {
                        "name" => filter.name = Some(value.to_string()),
                        "owner" => filter.owner = Some(value.to_string()),
                        "series" => filter.series = Some(value.to_string()),
                        "type" => filter.kind = Some(value.parse()?),
                        "promulgated" => filter.promulgated = Some(parse_flag(key, value)?),
                        _ => descending = parse_flag(key, value)?,
                    }
                }
                _ => trace!(key, "ignoring unrecognized list parameter"),
            }
        }

        if descending {
            for key in &mut query.sort {
                key.descending = true;
            }
        }

        Ok(query)
    }
}

fn parse_flag(key: &str, value: &str) -> StoreResult<bool> {
    match value {
        "1" => Ok(true),
        "0" => Ok(false),
        other => {
            Err(StoreError::InvalidQuery(format!(
                "invalid {key} value {other:?}, expected 1 or 0"
            )))
        }
    }
}

/// Plans a list request from raw query parameters.
pub fn plan<K, V>(params: &[(K, V)]) -> StoreResult<ListQuery>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    ListQuery::from_params(params)
}

/// Keeps only the highest revision of each base identity.
///
/// The surviving revision takes the position of the first entity seen for
/// its base identity, so the relative order of identities is preserved.
pub fn resolve_latest(entities: Vec<Arc<Entity>>) -> Vec<Arc<Entity>> {
    let mut slots: HashMap<BaseIdentity, usize> = HashMap::with_capacity(entities.len());
    let mut latest: Vec<Arc<Entity>> = Vec::with_capacity(entities.len());

    for entity in entities {
        match slots.get(&entity.base_identity()) {
            Some(&slot) => {
                if entity.revision() > latest[slot].revision() {
                    latest[slot] = entity;
                }
            }
            None => {
                slots.insert(entity.base_identity(), latest.len());
                latest.push(entity);
            }
        }
    }

    latest
}
