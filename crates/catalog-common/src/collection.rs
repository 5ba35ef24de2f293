//! Collections: the unit a tile handler decorates or rebuilds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bbox::BoundingBox;
use crate::item::Item;
use crate::link::Link;
use crate::{media_types, rel, STAC_VERSION};

/// A catalog collection with its items.
///
/// Items are held in memory alongside the collection and are written as
/// separate documents; the collection only serializes `item` links to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    #[serde(rename = "type", default = "collection_type")]
    pub type_: String,

    #[serde(default = "stac_version")]
    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_license")]
    pub license: String,

    #[serde(default)]
    pub extent: Extent,

    #[serde(default)]
    pub links: Vec<Link>,

    /// Open metadata (time series markers, overlays, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub items: Vec<Item>,
}

fn collection_type() -> String {
    "Collection".to_string()
}

fn stac_version() -> String {
    STAC_VERSION.to_string()
}

fn default_license() -> String {
    "proprietary".to_string()
}

impl Collection {
    /// Create an empty collection with a global extent and no time range.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_: collection_type(),
            stac_version: stac_version(),
            stac_extensions: Vec::new(),
            id: id.into(),
            title: None,
            description: description.into(),
            license: default_license(),
            extent: Extent::default(),
            links: Vec::new(),
            extra: Map::new(),
            items: Vec::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Relative location of items added here, and their `item` link href.
    pub fn item_href(item_id: &str) -> String {
        format!("./{}/{}.json", item_id, item_id)
    }

    /// Href of the `item` link for `item_id`, whatever layout it uses.
    ///
    /// A link refers to an item when its file name is `<id>.json`.
    pub fn item_link_href(&self, item_id: &str) -> Option<&str> {
        self.item_link_position(item_id)
            .map(|i| self.links[i].href.as_str())
    }

    /// Index in `links` of the `item` link for `item_id`.
    pub fn item_link_position(&self, item_id: &str) -> Option<usize> {
        self.links
            .iter()
            .position(|l| l.rel == rel::ITEM && href_names_item(&l.href, item_id))
    }

    /// Add an item and the `item` link pointing at it.
    ///
    /// An item with the same id replaces the existing one in place.
    pub fn add_item(&mut self, mut item: Item) {
        item.collection = Some(self.id.clone());

        if self.item_link_position(&item.id).is_none() {
            self.links.push(
                Link::new(Self::item_href(&item.id), rel::ITEM).with_type(media_types::JSON),
            );
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Drop every item and the `item` links that referenced them.
    pub fn clear_items(&mut self) {
        self.items.clear();
        self.remove_links(rel::ITEM);
    }

    /// Remove all links with the given relation. Returns how many were removed.
    pub fn remove_links(&mut self, rel: &str) -> usize {
        let before = self.links.len();
        self.links.retain(|l| l.rel != rel);
        before - self.links.len()
    }

    /// Add a link unless one with the same target is already present.
    pub fn add_link(&mut self, link: Link) -> bool {
        if self.links.iter().any(|existing| existing.same_target(&link)) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Declare a STAC extension schema, once.
    pub fn add_extension(&mut self, uri: &str) {
        if !self.stac_extensions.iter().any(|e| e == uri) {
            self.stac_extensions.push(uri.to_string());
        }
    }

    pub fn get_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}

/// Whether `href` points at `<item_id>.json`, in any directory.
pub(crate) fn href_names_item(href: &str, item_id: &str) -> bool {
    let file_name = href.rsplit('/').next().unwrap_or(href);
    file_name.strip_suffix(".json") == Some(item_id)
}

/// Spatial and temporal coverage of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Extent {
    #[serde(default)]
    pub spatial: SpatialExtent,

    #[serde(default)]
    pub temporal: TemporalExtent,
}

/// Spatial extent with bounding boxes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpatialExtent {
    pub bbox: Vec<BoundingBox>,
}

impl Default for SpatialExtent {
    fn default() -> Self {
        Self {
            bbox: vec![BoundingBox::default()],
        }
    }
}

impl SpatialExtent {
    pub fn single(bbox: BoundingBox) -> Self {
        Self { bbox: vec![bbox] }
    }
}

/// Temporal extent as `[start, end]` pairs; `null` ends are open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

impl Default for TemporalExtent {
    fn default() -> Self {
        Self {
            interval: vec![[None, None]],
        }
    }
}

impl TemporalExtent {
    pub fn single(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            interval: vec![[Some(start), Some(end)]],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_add_item_creates_item_link() {
        let mut collection = Collection::new("yuma", "Yuma airfield");
        collection.add_item(Item::new("2020-10-30T18:21:38Z"));

        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].collection.as_deref(), Some("yuma"));
        let link = collection.links.iter().find(|l| l.rel == "item").unwrap();
        assert_eq!(link.href, "./2020-10-30T18:21:38Z/2020-10-30T18:21:38Z.json");
    }

    #[test]
    fn test_add_item_replaces_same_id() {
        let mut collection = Collection::new("yuma", "");
        collection.add_item(Item::new("a"));
        collection.add_item(Item::new("a"));
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.links.len(), 1);
    }

    #[test]
    fn test_add_item_reuses_existing_layout() {
        let mut collection = Collection::new("yuma", "");
        collection.links.push(Link::new("./items/a.json", "item"));
        collection.add_item(Item::new("a"));

        assert_eq!(collection.links.len(), 1);
        assert_eq!(collection.item_link_href("a"), Some("./items/a.json"));
        assert!(collection.item_link_href("b").is_none());
    }

    #[test]
    fn test_href_names_item() {
        assert!(href_names_item("./a/a.json", "a"));
        assert!(href_names_item("a.json", "a"));
        assert!(href_names_item("./items/2020-10-30T18:21:38Z.json", "2020-10-30T18:21:38Z"));
        assert!(!href_names_item("./a/ab.json", "a"));
        assert!(!href_names_item("./a/a.geojson", "a"));
    }

    #[test]
    fn test_clear_items_keeps_other_links() {
        let mut collection = Collection::new("yuma", "");
        collection.links.push(Link::new("../catalog.json", "root"));
        collection.add_item(Item::new("a"));
        collection.add_item(Item::new("b"));

        collection.clear_items();
        assert!(collection.items.is_empty());
        assert_eq!(collection.links.len(), 1);
        assert_eq!(collection.links[0].rel, "root");
    }

    #[test]
    fn test_extent_serialization() {
        let mut collection = Collection::new("yuma", "");
        collection.extent.spatial = SpatialExtent::single(BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        collection.extent.temporal = TemporalExtent::single(
            Utc.with_ymd_and_hms(2020, 10, 30, 18, 21, 38).unwrap(),
            Utc.with_ymd_and_hms(2020, 11, 15, 18, 21, 38).unwrap(),
        );

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["extent"]["spatial"]["bbox"], json!([[1.0, 2.0, 3.0, 4.0]]));
        assert_eq!(
            value["extent"]["temporal"]["interval"],
            json!([["2020-10-30T18:21:38Z", "2020-11-15T18:21:38Z"]])
        );
        assert!(value.get("items").is_none());
    }

    #[test]
    fn test_default_temporal_extent_is_open() {
        let value = serde_json::to_value(TemporalExtent::default()).unwrap();
        assert_eq!(value["interval"], json!([[null, null]]));
    }
}
