//! Top-level error wrapper types.

use crate::{
    ConfigError, JsonError, NotFoundError, StorageError, UpstreamError, ValidationError,
};

/// Every error a Curio operation can produce.
///
/// # Examples
///
/// ```
/// use curio_error::{CurioError, NotFoundError};
///
/// let err: CurioError = NotFoundError::new("Project not found").into();
/// assert!(format!("{}", err).contains("Not Found"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CurioErrorKind {
    /// Malformed or missing input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Identifier or collection resolved to nothing
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Remote asset store failure
    #[from(UpstreamError)]
    Upstream(UpstreamError),
    /// Local index storage failure
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Curio error with kind discrimination.
///
/// # Examples
///
/// ```
/// use curio_error::{CurioResult, StorageError, StorageErrorKind};
///
/// fn save() -> CurioResult<()> {
///     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".to_string())))?
/// }
///
/// let err = save().unwrap_err();
/// assert_eq!(err.code(), "storage_error");
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Curio Error: {}", _0)]
pub struct CurioError(Box<CurioErrorKind>);

impl CurioError {
    /// Create a new error from a kind.
    pub fn new(kind: CurioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CurioErrorKind {
        &self.0
    }

    /// Stable, machine-readable failure indicator.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            CurioErrorKind::Validation(_) => "validation_error",
            CurioErrorKind::NotFound(_) => "not_found",
            CurioErrorKind::Upstream(_) => "upstream_error",
            CurioErrorKind::Storage(_) => "storage_error",
            CurioErrorKind::Config(_) => "config_error",
            CurioErrorKind::Json(_) => "json_error",
        }
    }

    /// Human-readable message without source locations.
    ///
    /// Validation and not-found messages are safe to show as-is. Everything
    /// else is summarised, since the detail may name internal paths.
    pub fn user_message(&self) -> String {
        match self.kind() {
            CurioErrorKind::Validation(e) => e.message.clone(),
            CurioErrorKind::NotFound(e) => e.message.clone(),
            CurioErrorKind::Upstream(_) => "The remote asset store rejected the request".to_string(),
            CurioErrorKind::Storage(_) => "The local asset index could not be updated".to_string(),
            CurioErrorKind::Config(_) => "The registry is misconfigured".to_string(),
            CurioErrorKind::Json(_) => "Malformed data".to_string(),
        }
    }

    /// True for errors raised by the remote asset store.
    pub fn is_upstream(&self) -> bool {
        matches!(self.kind(), CurioErrorKind::Upstream(_))
    }
}

// Generic From implementation for any type that converts to CurioErrorKind
impl<T> From<T> for CurioError
where
    T: Into<CurioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Curio operations.
pub type CurioResult<T> = std::result::Result<T, CurioError>;
