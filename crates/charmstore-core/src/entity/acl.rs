use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Operations guarded by an access control list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Groups allowed to perform each operation on one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAcl {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub read: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub write: Vec<String>,
}

impl ChannelAcl {
    pub fn groups(&self, op: Operation) -> &[String] {
        match op {
            Operation::Read => &self.read,
            Operation::Write => &self.write,
        }
    }
}

/// Per-channel access control lists of an entity.
///
/// A channel without an entry, or with an empty group list for an
/// operation, places no restriction on that operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl(BTreeMap<String, ChannelAcl>);

impl Acl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the groups allowed to perform `op` on `channel`.
    pub fn with_groups<I, S>(mut self, channel: &str, op: Operation, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_groups(channel, op, groups);
        self
    }

    pub fn set_groups<I, S>(&mut self, channel: &str, op: Operation, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.0.entry(channel.to_string()).or_default();
        let groups = groups.into_iter().map(Into::into).collect();
        match op {
            Operation::Read => entry.read = groups,
            Operation::Write => entry.write = groups,
        }
    }

    pub fn channel(&self, channel: &str) -> Option<&ChannelAcl> {
        self.0.get(channel)
    }

    /// Groups allowed to perform `op` on `channel`; empty when unrestricted.
    pub fn groups(&self, channel: &str, op: Operation) -> &[String] {
        self.channel(channel)
            .map(|acl| acl.groups(op))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_channel_is_unrestricted() {
        let acl = Acl::new().with_groups("edge", Operation::Read, ["charmers"]);
        assert!(acl.groups("stable", Operation::Read).is_empty());
        assert_eq!(acl.groups("edge", Operation::Read), ["charmers"]);
        assert!(acl.groups("edge", Operation::Write).is_empty());
    }

    #[test]
    fn test_acl_json_shape() {
        let acl = Acl::new()
            .with_groups("stable", Operation::Read, ["charmers", "test-user"])
            .with_groups("stable", Operation::Write, ["charmers"]);
        let json = serde_json::to_value(&acl).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "stable": {
                    "read": ["charmers", "test-user"],
                    "write": ["charmers"],
                }
            })
        );

        let back: Acl = serde_json::from_value(json).unwrap();
        assert_eq!(back, acl);
    }
}
