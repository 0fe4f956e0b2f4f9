use std::{cmp::Ordering, fmt, str::FromStr, sync::Arc};

use crate::{entity::Entity, error::StoreError, StoreResult};

/// Entity attributes a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    Owner,
    Series,
    Type,
    Revision,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Owner => "owner",
            SortField::Series => "series",
            SortField::Type => "type",
            SortField::Revision => "revision",
        }
    }

    fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        match self {
            SortField::Name => a.name().cmp(b.name()),
            SortField::Owner => a.owner().cmp(b.owner()),
            SortField::Series => a.series().cmp(b.series()),
            SortField::Type => a.kind.as_str().cmp(b.kind.as_str()),
            SortField::Revision => a.revision().cmp(&b.revision()),
        }
    }
}

impl FromStr for SortField {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(SortField::Name),
            "owner" => Ok(SortField::Owner),
            "series" => Ok(SortField::Series),
            "type" => Ok(SortField::Type),
            "revision" => Ok(SortField::Revision),
            other => Err(StoreError::InvalidSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    pub fn compare(&self, a: &Entity, b: &Entity) -> Ordering {
        let ordering = self.field.compare(a, b);
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_str())
    }
}

/// Parses one `sort` parameter value: a comma separated list of fields,
/// each optionally prefixed with `-` for descending order.
///
/// Empty segments are skipped. An unsupported field fails with
/// [`StoreError::InvalidSortField`] naming the field without its prefix.
pub fn parse_sort_keys(value: &str) -> StoreResult<Vec<SortKey>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            match segment.strip_prefix('-') {
                Some(field) => field.parse().map(SortKey::descending),
                None => segment.parse().map(SortKey::ascending),
            }
        })
        .collect()
}

/// Orders entities by `keys`, compared left to right.
///
/// Entities equal on every key are ordered by their preferred id string.
/// With no keys the input order is kept.
pub fn sort_entities(entities: Vec<Arc<Entity>>, keys: &[SortKey]) -> Vec<Arc<Entity>> {
    if keys.is_empty() {
        return entities;
    }

    let mut keyed: Vec<(String, Arc<Entity>)> = entities
        .into_iter()
        .map(|entity| (entity.preferred_id().to_string(), entity))
        .collect();

    keyed.sort_by(|(a_id, a), (b_id, b)| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a_id.cmp(b_id))
    });

    keyed.into_iter().map(|(_, entity)| entity).collect()
}
