//! Error types for the Curio asset registry.
//!
//! This crate provides the error taxonomy shared by every Curio crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions (where there is more than one)
//! - `*Error` struct wraps the kind or message with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Four errors make up the user-facing taxonomy:
//!
//! - [`ValidationError`] - malformed or missing input, never retried
//! - [`NotFoundError`] - an identifier or collection resolved to nothing
//! - [`UpstreamError`] - the remote asset store failed
//! - [`StorageError`] - the local index file could not be read or written
//!
//! # Examples
//!
//! ```
//! use curio_error::{CurioResult, ValidationError};
//!
//! fn require_file(present: bool) -> CurioResult<()> {
//!     if !present {
//!         Err(ValidationError::new("No image file provided"))?
//!     }
//!     Ok(())
//! }
//!
//! let err = require_file(false).unwrap_err();
//! assert_eq!(err.code(), "validation_error");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod not_found;
mod storage;
mod upstream;
mod validation;

pub use config::ConfigError;
pub use error::{CurioError, CurioErrorKind, CurioResult};
pub use json::JsonError;
pub use not_found::NotFoundError;
pub use storage::{StorageError, StorageErrorKind};
pub use upstream::{UpstreamError, UpstreamErrorKind};
pub use validation::ValidationError;
