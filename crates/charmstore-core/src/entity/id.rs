use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{constants::SCHEME, error::StoreError};

/// Fully-qualified reference to one revision of a charm or bundle.
///
/// The owner is optional so that promulgated references such as
/// `cs:trusty/mysql-7` can be represented alongside owned ones like
/// `cs:~openstack-charmers/trusty/mysql-7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    pub owner: Option<String>,
    pub series: String,
    pub name: String,
    pub revision: u32,
}

impl EntityId {
    pub fn new(
        owner: Option<&str>,
        series: impl Into<String>,
        name: impl Into<String>,
        revision: u32,
    ) -> Self {
        Self {
            owner: owner.map(String::from),
            series: series.into(),
            name: name.into(),
            revision,
        }
    }

    /// The same reference with the owner removed.
    pub fn without_owner(&self) -> Self {
        Self {
            owner: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}:")?;
        if let Some(owner) = &self.owner {
            write!(f, "~{owner}/")?;
        }
        write!(f, "{}/{}-{}", self.series, self.name, self.revision)
    }
}

impl FromStr for EntityId {
    type Err = StoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        static ENTITY_ID_RE: OnceLock<Regex> = OnceLock::new();
        let re = ENTITY_ID_RE.get_or_init(|| {
            Regex::new(
                r"(?x)
            ^(?:cs:)?                               # optional scheme
            (?:~(?P<owner>[a-z0-9][a-z0-9.+-]*)/)?  # optional owner
            (?P<series>[a-z][a-z0-9]*)/             # series
            (?P<name>[a-z][a-z0-9-]*?)              # name
            -(?P<revision>\d+)$                     # revision
            ",
            )
            .unwrap()
        });

        let invalid = || StoreError::InvalidEntityId(value.to_string());
        let caps = re.captures(value.trim()).ok_or_else(invalid)?;
        let revision = caps["revision"].parse::<u32>().map_err(|_| invalid())?;

        Ok(EntityId {
            owner: caps.name("owner").map(|m| m.as_str().to_string()),
            series: caps["series"].to_string(),
            name: caps["name"].to_string(),
            revision,
        })
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
