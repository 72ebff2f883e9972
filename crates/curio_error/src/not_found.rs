//! Not-found error types.

/// An identifier or collection resolved to nothing.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} at line {} in {}", message, line, file)]
pub struct NotFoundError {
    /// What could not be found
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use curio_error::NotFoundError;
    ///
    /// let err = NotFoundError::new("Image not found in gallery");
    /// assert!(format!("{}", err).contains("Not Found"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
