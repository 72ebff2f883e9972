//! Registry configuration.
//!
//! Configuration sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`curio.toml` shipped with the crate)
//! 2. User config in home directory (`~/.config/curio/curio.toml`)
//! 3. User config in current directory (`./curio.toml`)
//! 4. Environment variables prefixed `CURIO__` (`CURIO__CACHE__TTL_SECS=30`)

use curio_cache::TtlCacheConfig;
use curio_core::{AssetMetadata, CollectionName, ResourceKind};
use curio_error::{ConfigError, CurioError, CurioResult, NotFoundError};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../curio.toml");

/// How one collection is stored, uploaded and read.
///
/// ```toml
/// [collections.projects]
/// folder = "projects"
/// kind = "image"
/// reconcile = false
///
/// [collections.projects.defaults]
/// title = "Project"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollectionConfig {
    /// Remote folder uploads go to
    pub folder: String,

    /// Resource kind used for uploads and remote deletes
    #[serde(default)]
    pub kind: ResourceKind,

    /// Whether reads merge the remote listing into the local index
    #[serde(default = "default_reconcile")]
    pub reconcile: bool,

    /// Remote folder to list when reconciling; `None` lists every folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_folder: Option<String>,

    /// Upper bound on the remote listing
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Attribute defaults applied to new records
    #[serde(default)]
    pub defaults: AssetMetadata,
}

impl CollectionConfig {
    /// A collection uploading images to `folder` and reconciling against every folder.
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            kind: ResourceKind::Image,
            reconcile: default_reconcile(),
            list_folder: None,
            max_results: default_max_results(),
            defaults: AssetMetadata::new(),
        }
    }
}

fn default_reconcile() -> bool {
    true
}

fn default_max_results() -> usize {
    500
}

/// Location of the directory-backed remote store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Directory holding stored objects
    pub base_path: PathBuf,
    /// URL prefix objects are served under
    pub public_base_url: String,
}

/// Where standalone documents (resumes) are uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentsConfig {
    /// Remote folder for documents
    #[serde(default = "default_documents_folder")]
    pub folder: String,
}

fn default_documents_folder() -> String {
    "resumes".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            folder: default_documents_folder(),
        }
    }
}

/// Top-level registry configuration.
///
/// # Example
///
/// ```no_run
/// use curio::RegistryConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RegistryConfig::load()?;
/// println!("Index files live in {}", config.data_dir.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Directory holding one `<collection>.json` index file per collection
    pub data_dir: PathBuf,

    /// Development diagnostic mode: include internal error detail in responses
    #[serde(default)]
    pub diagnostics: bool,

    /// Collection view cache
    #[serde(default)]
    pub cache: TtlCacheConfig,

    /// Directory-backed remote store
    pub remote: RemoteConfig,

    /// Document uploads
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Collections by name
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionConfig>,
}

impl RegistryConfig {
    /// Load configuration from a specific file path layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> CurioResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));

        Self::finish(builder)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> CurioResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        // Add user config from home directory (optional)
        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/curio/curio.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        // Add user config from current directory (optional)
        builder = builder.add_source(File::with_name("curio").required(false));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> CurioResult<Self> {
        let config: Self = builder
            .add_source(
                Environment::with_prefix("CURIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                CurioError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                CurioError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check collection names and folders.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending entry.
    pub fn validate(&self) -> CurioResult<()> {
        for (name, collection) in &self.collections {
            if CollectionName::new(name.as_str()).is_err() {
                Err(ConfigError::new(format!(
                    "Invalid collection name '{}': use 1-64 characters of [a-z0-9_-]",
                    name
                )))?
            }
            if collection.folder.trim().is_empty() {
                Err(ConfigError::new(format!(
                    "Collection '{}' has an empty folder",
                    name
                )))?
            }
            if collection.max_results == 0 {
                Err(ConfigError::new(format!(
                    "Collection '{}' has max_results = 0",
                    name
                )))?
            }
        }
        if self.documents.folder.trim().is_empty() {
            Err(ConfigError::new("Documents folder is empty"))?
        }
        Ok(())
    }

    /// Look up a collection's configuration.
    ///
    /// # Errors
    ///
    /// Returns a `NotFoundError` if the collection is not configured.
    pub fn collection(&self, name: &CollectionName) -> CurioResult<&CollectionConfig> {
        self.collections.get(name.as_str()).ok_or_else(|| {
            NotFoundError::new(format!("Unknown collection: {}", name)).into()
        })
    }

    /// The bundled defaults alone.
    pub fn bundled() -> CurioResult<Self> {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        let config: Self = builder
            .build()
            .map_err(|e| CurioError::from(ConfigError::new(e.to_string())))?
            .try_deserialize()
            .map_err(|e| CurioError::from(ConfigError::new(e.to_string())))?;
        Ok(config)
    }

    /// Replace every on-disk location with paths under `root`.
    pub fn rooted_at(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.data_dir = root.join("index");
        self.remote.base_path = root.join("objects");
        self
    }
}
