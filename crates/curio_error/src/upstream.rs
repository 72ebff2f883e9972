//! Remote asset store error types.

/// Kinds of remote store failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum UpstreamErrorKind {
    /// Uploading an asset failed
    #[display("Upload failed: {}", _0)]
    Upload(String),
    /// Deleting a remote object failed
    #[display("Delete failed: {}", _0)]
    Delete(String),
    /// Listing remote objects failed
    #[display("Listing failed: {}", _0)]
    List(String),
    /// The remote store could not be reached at all
    #[display("Remote store unavailable: {}", _0)]
    Unavailable(String),
}

/// Remote store failure with location tracking.
///
/// # Examples
///
/// ```
/// use curio_error::{UpstreamError, UpstreamErrorKind};
///
/// let err = UpstreamError::new(UpstreamErrorKind::Upload("quota exceeded".to_string()));
/// assert!(format!("{}", err).contains("quota exceeded"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upstream Error: {} at line {} in {}", kind, line, file)]
pub struct UpstreamError {
    /// The kind of error that occurred
    pub kind: UpstreamErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl UpstreamError {
    /// Create a new upstream error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UpstreamErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
