//! Catalog items: one timestamped, georeferenced entry of a collection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::asset::Asset;
use crate::bbox::BoundingBox;
use crate::link::Link;
use crate::STAC_VERSION;

/// GeoJSON geometry. Only polygons are built here; anything else read from
/// disk is kept as-is in `coordinates`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

impl Geometry {
    /// Rectangle covering `bbox`, as a closed single-ring polygon.
    pub fn polygon(bbox: &BoundingBox) -> Self {
        let ring: Vec<Value> = bbox
            .ring()
            .into_iter()
            .map(|[x, y]| Value::from(vec![x, y]))
            .collect();
        Self {
            kind: "Polygon".to_string(),
            coordinates: Value::Array(vec![Value::Array(ring)]),
        }
    }
}

/// Item properties. `datetime` is always written, as `null` when unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Properties {
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,

    #[serde(default = "stac_version")]
    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,

    #[serde(default)]
    pub properties: Properties,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn stac_version() -> String {
    STAC_VERSION.to_string()
}

impl Item {
    /// Create an item with no geometry, time or content.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            type_: feature_type(),
            stac_version: stac_version(),
            stac_extensions: Vec::new(),
            id: id.into(),
            geometry: None,
            bbox: None,
            properties: Properties::default(),
            links: Vec::new(),
            assets: BTreeMap::new(),
            collection: None,
            extra: Map::new(),
        }
    }

    /// Set bbox and the matching rectangle geometry.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.geometry = Some(Geometry::polygon(&bbox));
        self.bbox = Some(bbox);
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.properties.datetime = Some(datetime);
        self
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.properties.datetime
    }

    /// Add a link unless one with the same target is already present.
    ///
    /// Returns `true` when the link was added.
    pub fn add_link(&mut self, link: Link) -> bool {
        if self.links.iter().any(|existing| existing.same_target(&link)) {
            return false;
        }
        self.links.push(link);
        true
    }

    /// Insert or replace an asset, returning the previous one.
    pub fn add_asset(&mut self, key: impl Into<String>, asset: Asset) -> Option<Asset> {
        self.assets.insert(key.into(), asset)
    }

    /// Links with the given relation, in order.
    pub fn links_with_rel<'a>(&'a self, rel: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.iter().filter(move |l| l.rel == rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_item_json_shape() {
        let bbox = BoundingBox::new(-115.2, 32.0, -114.0, 33.2);
        let dt = Utc.with_ymd_and_hms(2020, 10, 30, 18, 21, 38).unwrap();
        let item = Item::new("2020-10-30T18:21:38Z")
            .with_bbox(bbox)
            .with_datetime(dt);

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["properties"]["datetime"], "2020-10-30T18:21:38Z");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert_eq!(value["geometry"]["coordinates"][0][0], json!([-115.2, 32.0]));
        assert_eq!(value["geometry"]["coordinates"][0][4], json!([-115.2, 32.0]));
        assert_eq!(value["bbox"], json!([-115.2, 32.0, -114.0, 33.2]));
    }

    #[test]
    fn test_null_datetime_is_accepted() {
        let value = json!({
            "type": "Feature",
            "stac_version": "1.0.0",
            "id": "no-time",
            "geometry": null,
            "properties": {"datetime": null, "start_datetime": "2020-01-01T00:00:00Z"},
            "links": [],
            "assets": {}
        });
        let item: Item = serde_json::from_value(value).unwrap();
        assert!(item.datetime().is_none());
        assert!(item.properties.additional.contains_key("start_datetime"));
    }

    #[test]
    fn test_add_link_skips_duplicates() {
        let mut item = Item::new("a");
        assert!(item.add_link(Link::new("https://t/{z}/{x}/{y}.png", "xyz")));
        assert!(!item.add_link(Link::new("https://t/{z}/{x}/{y}.png", "xyz")));
        assert_eq!(item.links_with_rel("xyz").count(), 1);
    }
}
