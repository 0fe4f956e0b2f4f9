use error::StoreError;

pub mod access;
pub mod archive;
pub mod blob;
pub mod catalog;
pub mod constants;
pub mod entity;
pub mod error;
pub mod identity;
pub mod query;
pub mod sort;

pub type StoreResult<T> = std::result::Result<T, StoreError>;
