//! Catalog link record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A hyperlink to a related resource.
///
/// One record type covers every relation: tile (`xyz`) links, hierarchy
/// links (`item`, `child`, ...) and anything loaded from disk. Fields the
/// catalog does not model explicitly (`role`, `proj:epsg`, `time`,
/// `datetime`, ...) live in `extra` and are flattened on serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The relationship type (e.g., "xyz", "item", "child").
    pub rel: String,

    /// The URI of the linked resource.
    pub href: String,

    /// The media type of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Additional fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            media_type: None,
            title: None,
            extra: Map::new(),
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set an extra field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Whether the link carries `role: [..., "data", ...]`.
    pub fn has_data_role(&self) -> bool {
        self.extra
            .get("role")
            .and_then(Value::as_array)
            .is_some_and(|roles| roles.iter().any(|r| r.as_str() == Some("data")))
    }

    /// Identity used for de-duplication: relation, target and time marker.
    pub fn same_target(&self, other: &Link) -> bool {
        self.rel == other.rel
            && self.href == other.href
            && self.extra.get("time") == other.extra.get("time")
    }
}
