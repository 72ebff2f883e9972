//! Resource kind enumeration.

use serde::{Deserialize, Serialize};

/// How the remote store treats an uploaded object.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Images (PNG, JPEG, WebP, etc.)
    #[default]
    #[display("image")]
    Image,
    /// Opaque documents (PDF, DOCX, etc.)
    #[display("raw")]
    Raw,
}

impl ResourceKind {
    /// Convert to the string the remote store expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(ResourceKind::Image),
            "raw" => Ok(ResourceKind::Raw),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
