use std::collections::BTreeMap;

use charmstore_core::entity::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Derived metadata of one result, keyed by field name.
pub type MetaBag = BTreeMap<String, Value>;

/// One listed entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityResult {
    /// Preferred id of the entity.
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: MetaBag,
}

/// Response to a list request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListResponse {
    pub results: Vec<EntityResult>,
}

impl ListResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Result ids rendered as strings, in response order.
    pub fn ids(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|result| result.id.to_string())
            .collect()
    }
}
