use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, PoisonError, RwLock},
    time::Duration,
};

use charmstore_utils::{
    path::{expand_path, xdg_config_home, xdg_data_home},
    time::parse_duration,
};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::info;

use crate::{
    annotations::annotate_document,
    error::{ConfigError, Result},
};

pub const DEFAULT_CHANNEL: &str = "stable";
pub const DEFAULT_PARALLEL_LIMIT: u32 = 4;
pub const DEFAULT_METADATA_TIMEOUT: &str = "30s";

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

/// Listing engine configuration
#[derive(Clone, Debug, Deserialize, Serialize, DocumentedFields)]
pub struct Config {
    /// Channel whose access control lists govern what a listing exposes.
    /// Default: stable
    #[serde(default = "default_channel")]
    pub channel: String,

    /// If true, metadata for different entities is computed concurrently.
    /// Default: true
    pub parallel: Option<bool>,

    /// Maximum number of entities whose metadata is computed at once.
    /// Default: 4
    pub parallel_limit: Option<u32>,

    /// Time allowed for computing the requested metadata of one entity.
    /// Entities that exceed it are dropped from the listing.
    /// Default: 30s
    pub metadata_timeout: Option<String>,

    /// Catalog snapshot used by the command line tool.
    /// Default: $XDG_DATA_HOME/charmstore/catalog.json
    pub catalog_path: Option<String>,

    /// Directory holding archive blobs, one file per blob name.
    /// Default: $XDG_DATA_HOME/charmstore/blobs
    pub blobs_path: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("CHARMSTORE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("charmstore").join("config.toml"),
    })
});

/// Loads the configuration file and installs it as the process-wide config.
pub fn init() -> Result<()> {
    let config = Config::new()?;
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    Ok(())
}

/// Points subsequent [`init`] calls at a different configuration file.
pub fn set_config_path(path: PathBuf) {
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = path;
}

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Returns the process-wide configuration, falling back to defaults when
/// [`init`] has not run.
pub fn get_config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_else(Config::default_config)
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        let data_root = xdg_data_home().join("charmstore");

        Self {
            channel: default_channel(),
            parallel: Some(true),
            parallel_limit: Some(DEFAULT_PARALLEL_LIMIT),
            metadata_timeout: Some(DEFAULT_METADATA_TIMEOUT.to_string()),
            catalog_path: Some(data_root.join("catalog.json").display().to_string()),
            blobs_path: Some(data_root.join("blobs").display().to_string()),
        }
    }

    /// Reads the configuration file, using defaults if it does not exist.
    pub fn new() -> Result<Self> {
        let path = config_path();

        let mut config = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default_config(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    /// Validates the configuration and fills in defaults for unset options.
    pub fn resolve(&mut self) -> Result<()> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::EmptyChannel);
        }

        self.parallel.get_or_insert(true);
        let limit = *self.parallel_limit.get_or_insert(DEFAULT_PARALLEL_LIMIT);
        if limit == 0 {
            return Err(ConfigError::InvalidParallelLimit(limit));
        }

        let timeout = self
            .metadata_timeout
            .get_or_insert_with(|| DEFAULT_METADATA_TIMEOUT.to_string());
        if parse_duration(timeout.as_str()).is_none_or(|d| d.is_zero()) {
            return Err(ConfigError::InvalidTimeout(timeout.clone()));
        }

        Ok(())
    }

    /// Number of entities whose metadata may be composed concurrently.
    pub fn composition_workers(&self) -> usize {
        if self.parallel.unwrap_or(true) {
            self.parallel_limit.unwrap_or(DEFAULT_PARALLEL_LIMIT).max(1) as usize
        } else {
            1
        }
    }

    pub fn get_metadata_timeout(&self) -> Duration {
        self.metadata_timeout
            .as_deref()
            .and_then(parse_duration)
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs(30))
    }

    pub fn get_catalog_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("CHARMSTORE_CATALOG") {
            return Ok(expand_path(&env_path)?);
        }
        match &self.catalog_path {
            Some(path) => Ok(expand_path(path)?),
            None => Ok(xdg_data_home().join("charmstore").join("catalog.json")),
        }
    }

    pub fn get_blobs_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("CHARMSTORE_BLOBS") {
            return Ok(expand_path(&env_path)?);
        }
        match &self.blobs_path {
            Some(path) => Ok(expand_path(path)?),
            None => Ok(xdg_data_home().join("charmstore").join("blobs")),
        }
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;
        annotate_document::<Config>(&mut doc)?;
        Ok(doc)
    }
}

/// Writes the documented default configuration to [`CONFIG_PATH`].
pub fn generate_default_config() -> Result<PathBuf> {
    let path = config_path();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(path)
}
