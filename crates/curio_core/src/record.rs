//! Asset records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection-specific attributes carried through untouched (title, category, ...).
pub type AssetMetadata = Map<String, Value>;

/// Keys owned by the registry itself; caller metadata may not override them.
pub const RESERVED_KEYS: [&str; 4] = ["url", "publicId", "remoteId", "timestamp"];

/// One entry in a collection.
///
/// Serialized flat, so the index file stays hand-editable:
///
/// ```json
/// {
///   "url": "https://cdn.example.com/image/upload/v1/projects/abc.png",
///   "publicId": "projects/abc",
///   "timestamp": 1718000000000,
///   "title": "Riverside",
///   "category": "Residential"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Canonical remote address; unique within a reconciled view
    pub url: String,
    /// The remote store's identifier, preferred over URL parsing for deletion
    #[serde(rename = "publicId", alias = "remoteId", default)]
    pub remote_id: Option<String>,
    /// Milliseconds since the Unix epoch; the sort key, newest first
    pub timestamp: i64,
    /// Opaque pass-through attributes
    #[serde(flatten)]
    pub attributes: AssetMetadata,
}

impl AssetRecord {
    /// Create a record without extra attributes.
    pub fn new(url: impl Into<String>, remote_id: Option<String>, timestamp: i64) -> Self {
        Self {
            url: url.into(),
            remote_id,
            timestamp,
            attributes: Map::new(),
        }
    }

    /// Attach pass-through attributes, dropping any reserved keys.
    pub fn with_attributes(mut self, attributes: AssetMetadata) -> Self {
        self.attributes = attributes
            .into_iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .collect();
        self
    }

    /// Leniently interpret a JSON value as a record.
    ///
    /// Returns `None` for anything that is not an object with a non-empty string
    /// `url`. A missing, null or non-numeric `timestamp` becomes `now_millis`.
    ///
    /// # Example
    ///
    /// ```
    /// use curio_core::AssetRecord;
    /// use serde_json::json;
    ///
    /// let record = AssetRecord::from_json(json!({"url": "a", "title": "x"}), 42).unwrap();
    /// assert_eq!(record.timestamp, 42);
    /// assert_eq!(record.attributes["title"], "x");
    ///
    /// assert!(AssetRecord::from_json(json!({"title": "no url"}), 42).is_none());
    /// ```
    pub fn from_json(value: Value, now_millis: i64) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };

        let url = match fields.remove("url") {
            Some(Value::String(url)) if !url.is_empty() => url,
            _ => return None,
        };

        let remote_id = ["publicId", "remoteId"]
            .iter()
            .filter_map(|key| fields.remove(*key))
            .find_map(|value| match value {
                Value::String(id) if !id.is_empty() => Some(id),
                _ => None,
            });

        let timestamp = fields
            .remove("timestamp")
            .and_then(|value| match value {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
                _ => None,
            })
            .unwrap_or(now_millis);

        Some(Self {
            url,
            remote_id,
            timestamp,
            attributes: fields,
        })
    }
}
