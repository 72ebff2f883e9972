//! Response envelope for the request-handling layer.

use curio_error::CurioError;
use serde::Serialize;

/// Uniform result shape: a success flag, a stable failure code, and a
/// human-readable message.
///
/// Internal error detail is only included when diagnostics are enabled.
///
/// # Example
///
/// ```
/// use curio::ApiResponse;
/// use curio_error::{CurioError, NotFoundError};
///
/// let err: CurioError = NotFoundError::new("Image not found in gallery").into();
/// let response: ApiResponse<()> = ApiResponse::failure(&err, false);
///
/// let json = serde_json::to_value(&response).unwrap();
/// assert_eq!(json["success"], false);
/// assert_eq!(json["code"], "not_found");
/// assert!(json.get("error").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Stable failure indicator, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Human-readable message
    pub message: String,
    /// Payload, absent on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Internal error detail, diagnostics mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: None,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// A failed response for `err`.
    pub fn failure(err: &CurioError, diagnostics: bool) -> Self {
        Self {
            success: false,
            code: Some(err.code()),
            message: err.user_message(),
            data: None,
            error: diagnostics.then(|| err.to_string()),
        }
    }
}
