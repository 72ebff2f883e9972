//! Remote asset store trait definition.

use curio_core::{ListOptions, RemoteAsset, ResourceKind, UploadOptions, UploadedAsset};
use curio_error::CurioResult;
use std::path::Path;

/// Trait for the content-delivery store that hosts asset binaries.
///
/// Implementations report failures as `UpstreamError`; they never swallow
/// them. Deciding which failures are fatal is the caller's business.
#[async_trait::async_trait]
pub trait RemoteAssetStore: Send + Sync {
    /// Upload a local file and return its public URL and remote identifier.
    ///
    /// # Arguments
    ///
    /// * `path` - The staged local file to upload
    /// * `options` - Destination folder and resource kind
    async fn upload(&self, path: &Path, options: &UploadOptions) -> CurioResult<UploadedAsset>;

    /// Delete a remote object by identifier.
    ///
    /// # Arguments
    ///
    /// * `id` - The remote identifier returned by `upload()` or `list()`
    /// * `kind` - The resource kind the object was uploaded as
    async fn delete(&self, id: &str, kind: ResourceKind) -> CurioResult<()>;

    /// List image objects, newest first.
    ///
    /// # Arguments
    ///
    /// * `folder` - Restrict the listing to one folder, or `None` for every folder
    /// * `options` - Listing bounds
    async fn list(&self, folder: Option<&str>, options: &ListOptions)
    -> CurioResult<Vec<RemoteAsset>>;
}
