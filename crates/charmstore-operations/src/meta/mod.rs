//! Derived metadata providers and their composition.

mod archive;
pub mod bundle;
mod charm;
pub mod composer;
pub mod context;
pub mod error;
mod id;
pub mod registry;
pub mod related;

pub use composer::MetadataComposer;
pub use context::ProviderContext;
pub use error::{ProviderError, ProviderResult};
pub use registry::{Provider, ProviderRegistry};
pub use related::RelatedIndex;
