use charmstore_utils::error::PathError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(charmstore_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(charmstore_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(charmstore_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Listing channel must not be empty")]
    #[diagnostic(
        code(charmstore_config::empty_channel),
        help("Set `channel` to a release channel such as \"stable\"")
    )]
    EmptyChannel,

    #[error("Invalid parallel limit: {0}")]
    #[diagnostic(
        code(charmstore_config::parallel_limit),
        help("`parallel_limit` must be at least 1")
    )]
    InvalidParallelLimit(u32),

    #[error("Invalid metadata timeout: {0}")]
    #[diagnostic(
        code(charmstore_config::metadata_timeout),
        help("Use a duration such as \"30s\", \"1m30s\" or \"500ms\"")
    )]
    InvalidTimeout(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(charmstore_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(charmstore_config::path))]
    Path(#[from] PathError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(charmstore_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(charmstore_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
