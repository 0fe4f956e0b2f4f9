use std::collections::BTreeSet;

use crate::constants::EVERYONE;

/// Already-verified requester identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    User {
        name: String,
        groups: BTreeSet<String>,
    },
    /// Administrative principal; bypasses access control.
    Admin,
}

impl Identity {
    pub fn user<I, S>(name: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Identity::User {
            name: name.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Identity::User {
                name, ..
            } => Some(name),
            _ => None,
        }
    }

    /// Whether the identity holds `group`.
    ///
    /// A user is a member of its own name and its declared groups; everyone
    /// holds [`EVERYONE`].
    pub fn member_of(&self, group: &str) -> bool {
        if group == EVERYONE {
            return true;
        }
        match self {
            Identity::User {
                name,
                groups,
            } => name == group || groups.contains(group),
            Identity::Anonymous | Identity::Admin => false,
        }
    }
}
