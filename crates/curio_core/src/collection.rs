//! Collection names.

use curio_error::{CurioResult, ValidationError};
use serde::{Deserialize, Serialize};

const MAX_LEN: usize = 64;

/// Name of an asset collection, e.g. `gallery` or `projects`.
///
/// The name doubles as the stem of the collection's index file, so it is
/// restricted to 1-64 characters of `[a-z0-9_-]`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate and wrap a collection name.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the name is empty, too long, or contains
    /// characters outside `[a-z0-9_-]`.
    ///
    /// # Example
    ///
    /// ```
    /// use curio_core::CollectionName;
    ///
    /// assert!(CollectionName::new("gallery").is_ok());
    /// assert!(CollectionName::new("../etc").is_err());
    /// ```
    #[track_caller]
    pub fn new(name: impl Into<String>) -> CurioResult<Self> {
        let name = name.into();
        if name.is_empty() || name.len() > MAX_LEN {
            Err(ValidationError::new(format!(
                "Collection name must be 1-{} characters",
                MAX_LEN
            )))?
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            Err(ValidationError::new(format!(
                "Invalid collection name: {}",
                name
            )))?
        }
        Ok(Self(name))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CollectionName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).map_err(|e| e.user_message())
    }
}

impl From<CollectionName> for String {
    fn from(name: CollectionName) -> Self {
        name.0
    }
}

impl std::str::FromStr for CollectionName {
    type Err = curio_error::CurioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
