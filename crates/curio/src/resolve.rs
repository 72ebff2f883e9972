//! Delete identifier resolution.
//!
//! An identifier arriving on a delete request may be a position in the stored
//! sequence, a remote identifier, a URL, or a fragment of a URL. Resolution
//! tries those interpretations in a fixed order and stops at the first hit.

use curio_core::AssetRecord;
use regex::Regex;
use std::sync::LazyLock;

/// Matches `/upload/[v<digits>/]<id>[.<ext>]` at the end of a delivery URL.
static REMOTE_ID_IN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/upload/(?:v\d+/)?(.+?)(?:\.[^./]+)?$").expect("Valid remote id regex")
});

/// Which rule resolved an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MatchKind {
    /// Parsed as an in-bounds position
    #[display("position")]
    Position,
    /// Equal to a record's remote identifier
    #[display("remote_id")]
    RemoteId,
    /// Equal to a record's URL
    #[display("url")]
    ExactUrl,
    /// Substring of a URL, or a URL is a substring of it
    #[display("substring")]
    Substring,
}

/// A resolved identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Position of the record in the sequence
    pub index: usize,
    /// The rule that matched
    pub matched_by: MatchKind,
}

/// Resolve `identifier` against `records`.
///
/// Priority order:
/// 1. all-digit identifier within bounds: position
/// 2. first record whose remote identifier equals it
/// 3. first record whose URL equals it
/// 4. first record whose URL contains it, or that it contains
///
/// An empty identifier never resolves.
///
/// # Example
///
/// ```
/// use curio::{resolve_identifier, MatchKind};
/// use curio_core::AssetRecord;
///
/// let records = vec![
///     AssetRecord::new("https://cdn/x/a.png", Some("x/a".to_string()), 1),
///     AssetRecord::new("https://cdn/x/b.png", None, 2),
/// ];
///
/// assert_eq!(resolve_identifier(&records, "1").unwrap().index, 1);
/// assert_eq!(resolve_identifier(&records, "x/a").unwrap().matched_by, MatchKind::RemoteId);
/// assert_eq!(resolve_identifier(&records, "b.png").unwrap().matched_by, MatchKind::Substring);
/// assert!(resolve_identifier(&records, "7").is_none());
/// ```
pub fn resolve_identifier(records: &[AssetRecord], identifier: &str) -> Option<Resolution> {
    if identifier.is_empty() {
        return None;
    }

    let found = |index: usize, matched_by: MatchKind| Resolution { index, matched_by };

    if identifier.bytes().all(|b| b.is_ascii_digit())
        && let Ok(index) = identifier.parse::<usize>()
        && index < records.len()
    {
        return Some(found(index, MatchKind::Position));
    }

    if let Some(index) = records
        .iter()
        .position(|r| r.remote_id.as_deref() == Some(identifier))
    {
        return Some(found(index, MatchKind::RemoteId));
    }

    if let Some(index) = records.iter().position(|r| r.url == identifier) {
        return Some(found(index, MatchKind::ExactUrl));
    }

    records
        .iter()
        .position(|r| !r.url.is_empty() && (r.url.contains(identifier) || identifier.contains(&r.url)))
        .map(|index| found(index, MatchKind::Substring))
}

/// Best-effort remote identifier for a record.
///
/// Prefers the stored remote identifier, then falls back to the path segment
/// after `/upload/` in the URL (minus any version prefix and file extension).
///
/// # Example
///
/// ```
/// use curio::remote_id_for;
/// use curio_core::AssetRecord;
///
/// let record = AssetRecord::new(
///     "https://res.example.com/demo/image/upload/v1712/gallery/sunset.jpg",
///     None,
///     0,
/// );
/// assert_eq!(remote_id_for(&record).as_deref(), Some("gallery/sunset"));
/// ```
pub fn remote_id_for(record: &AssetRecord) -> Option<String> {
    if let Some(id) = record.remote_id.as_deref().filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }
    extract_remote_id(&record.url)
}

/// Extract a remote identifier from a delivery URL.
pub fn extract_remote_id(url: &str) -> Option<String> {
    REMOTE_ID_IN_URL
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .filter(|id| !id.is_empty())
}
