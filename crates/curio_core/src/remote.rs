//! Values exchanged with a remote asset store.

use crate::{AssetRecord, ResourceKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file staged on local disk, waiting to be uploaded.
///
/// The file is a temporary artifact: whoever consumes the payload removes it
/// once the upload has been attempted.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FilePayload {
    path: PathBuf,
    original_name: Option<String>,
}

impl FilePayload {
    /// Wrap a staged file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            original_name: None,
        }
    }

    /// Record the name the file had on the client.
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Borrow the staged path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

/// Where and how to upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Remote folder, e.g. `gallery`
    pub folder: String,
    /// Resource kind
    pub kind: ResourceKind,
    /// Name the file had on the client, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl UploadOptions {
    /// Upload into `folder` as `kind`.
    pub fn new(folder: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            folder: folder.into(),
            kind,
            file_name: None,
        }
    }

    /// Record the client-side file name.
    pub fn with_file_name(mut self, name: impl Into<Option<String>>) -> Self {
        self.file_name = name.into();
        self
    }

    /// Lowercase extension for the stored object.
    ///
    /// Taken from the staged `path`, falling back to the client-side file name.
    /// Staging (`.tmp`) extensions are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use curio_core::{ResourceKind, UploadOptions};
    /// use std::path::Path;
    ///
    /// let options = UploadOptions::new("resumes", ResourceKind::Raw)
    ///     .with_file_name("CV.PDF".to_string());
    /// assert_eq!(options.extension(Path::new("/tmp/upload-1")).as_deref(), Some("pdf"));
    /// assert_eq!(options.extension(Path::new("/tmp/a.png")).as_deref(), Some("png"));
    /// ```
    pub fn extension(&self, path: &Path) -> Option<String> {
        let usable = |ext: &std::ffi::OsStr| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            (!ext.is_empty() && ext != "tmp").then_some(ext)
        };
        path.extension().and_then(usable).or_else(|| {
            self.file_name
                .as_deref()
                .and_then(|name| Path::new(name).extension())
                .and_then(usable)
        })
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// Public URL of the stored object
    pub url: String,
    /// Remote identifier of the stored object
    pub id: String,
}

/// Options for listing remote objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListOptions {
    /// Upper bound on the number of objects returned
    pub max_results: usize,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self { max_results: 500 }
    }
}

/// One object as reported by a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteAsset {
    /// Public URL
    pub url: String,
    /// Remote identifier, if the store reported one
    pub id: Option<String>,
    /// Creation time in milliseconds since the Unix epoch, if known
    pub timestamp: Option<i64>,
}

impl RemoteAsset {
    /// Convert to a record, defaulting a missing timestamp to `now_millis`.
    pub fn into_record(self, now_millis: i64) -> AssetRecord {
        AssetRecord::new(
            self.url,
            self.id.filter(|id| !id.is_empty()),
            self.timestamp.unwrap_or(now_millis),
        )
    }
}
