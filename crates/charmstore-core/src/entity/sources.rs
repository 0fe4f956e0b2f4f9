use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw documents from which derived metadata is computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charm_meta: Option<CharmMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charm_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charm_actions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_data: Option<BundleData>,
}

/// A charm's `metadata.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharmMeta {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub subordinate: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub provides: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requires: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, Relation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<String>,
}

impl CharmMeta {
    /// Interfaces this charm provides.
    pub fn provided_interfaces(&self) -> impl Iterator<Item = &str> {
        self.provides.values().map(|rel| rel.interface.as_str())
    }

    /// Interfaces this charm requires.
    pub fn required_interfaces(&self) -> impl Iterator<Item = &str> {
        self.requires.values().map(|rel| rel.interface.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub interface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Relation {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            ..Default::default()
        }
    }
}

/// A bundle's `bundle.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleData {
    #[serde(default, alias = "services")]
    pub applications: BTreeMap<String, ApplicationSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub machines: BTreeMap<String, MachineSpec>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub series: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relations: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSpec {
    pub charm: String,
    #[serde(default)]
    pub num_units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_accepts_legacy_services_key() {
        let data: BundleData = serde_json::from_value(serde_json::json!({
            "services": {
                "wordpress": {"charm": "wordpress", "num_units": 1},
                "mysql": {"charm": "mysql", "num_units": 1},
            },
            "relations": [["wordpress:db", "mysql:server"]],
        }))
        .unwrap();

        assert_eq!(data.applications.len(), 2);
        assert_eq!(data.applications["mysql"].num_units, 1);
        assert!(data.machines.is_empty());
    }

    #[test]
    fn test_charm_meta_interfaces() {
        let meta: CharmMeta = serde_json::from_value(serde_json::json!({
            "name": "wordpress",
            "provides": {"url": {"interface": "http"}},
            "requires": {
                "db": {"interface": "mysql", "limit": 1},
                "cache": {"interface": "varnish", "optional": true},
            },
        }))
        .unwrap();

        assert_eq!(meta.provided_interfaces().collect::<Vec<_>>(), ["http"]);
        let mut required: Vec<_> = meta.required_interfaces().collect();
        required.sort_unstable();
        assert_eq!(required, ["mysql", "varnish"]);
        assert_eq!(meta.requires["db"].limit, Some(1));
    }
}
