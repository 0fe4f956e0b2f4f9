pub mod context;
pub mod list;
pub mod meta;
pub mod progress;
pub mod types;

#[cfg(test)]
pub mod test_utils;

pub use context::ListContext;
pub use types::*;
