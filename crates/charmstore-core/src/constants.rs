/// Group held by every identity, anonymous requesters included.
pub const EVERYONE: &str = "everyone";

pub const SCHEME: &str = "cs";

/// Series under which bundles are published.
pub const BUNDLE_SERIES: &str = "bundle";

pub const STABLE_CHANNEL: &str = "stable";
