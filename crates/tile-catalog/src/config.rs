//! Handler configuration.
//!
//! Three documents drive one enrichment run: the catalog-level settings,
//! the endpoint (tile service and time entries) and the collection
//! settings. Keys keep the names used in the catalog YAML files
//! (`EndPoint`, `Bands`, `TimeEntries`, ...); unknown keys are ignored.

use std::path::PathBuf;

use catalog_common::BoundingBox;
use serde::{Deserialize, Serialize};

use crate::error::{EnrichError, EnrichResult};

/// Timestamp of the implicit entry when only a tile source is configured.
pub const DEFAULT_DATETIME: &str = "2020-10-30T18:21:38Z";

/// Title of synthesized tile links when the endpoint sets none.
pub const DEFAULT_TILE_TITLE: &str = "Titiler XYZ Tiles";

/// Catalog-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog identifier, used as the build sub-directory.
    #[serde(default = "default_catalog_id")]
    pub id: String,

    /// Root of the build output.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
}

fn default_catalog_id() -> String {
    "catalog".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            id: default_catalog_id(),
            build_dir: default_build_dir(),
        }
    }
}

/// Per-collection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    #[serde(rename = "Name")]
    pub name: Option<String>,

    #[serde(rename = "Title")]
    pub title: Option<String>,

    #[serde(rename = "Description")]
    pub description: Option<String>,

    /// GeoJSON file to publish next to the catalog as an overlay.
    #[serde(default)]
    pub geojson_source: Option<PathBuf>,

    #[serde(default)]
    pub overlay_name: Option<String>,

    #[serde(default)]
    pub overlay_visible: bool,

    #[serde(default)]
    pub overlay_style: Option<serde_json::Value>,
}

/// How time entries are reconciled against the collection's items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Clear the collection and build one item per entry.
    #[default]
    Rebuild,
    /// Decorate existing items whose datetime matches an entry.
    Merge,
}

/// Where tile links are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkPlacement {
    #[default]
    Item,
    /// On the collection, each link tagged with its entry's `time`.
    Collection,
}

/// Tile service endpoint and the time series it renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,

    /// Base URL of the tile service.
    #[serde(rename = "EndPoint", default)]
    pub endpoint: Option<String>,

    #[serde(rename = "S3Bucket", default)]
    pub s3_bucket: Option<String>,

    /// Object key used by entries that do not name their own source.
    #[serde(rename = "S3Key", default)]
    pub s3_key: Option<String>,

    /// Source URL or URL template (e.g. `{cog_url}`).
    #[serde(rename = "COG_URL", default)]
    pub cog_url: Option<String>,

    #[serde(rename = "Bands", default)]
    pub bands: Option<Vec<u32>>,

    #[serde(rename = "Rescale", default)]
    pub rescale: Option<[f64; 2]>,

    #[serde(rename = "Reproject", default)]
    pub reproject: Option<String>,

    #[serde(rename = "Bbox", default)]
    pub bbox: Option<BoundingBox>,

    /// Timestamp of the single implicit entry when `TimeEntries` is absent.
    #[serde(rename = "DateTime", default)]
    pub datetime: Option<String>,

    /// EPSG code advertised on tile links.
    #[serde(rename = "DataProjection", default)]
    pub data_projection: Option<u32>,

    #[serde(rename = "Title", default)]
    pub title: Option<String>,

    #[serde(rename = "Strategy", default)]
    pub strategy: Strategy,

    #[serde(rename = "LinkPlacement", default)]
    pub link_placement: LinkPlacement,

    /// Emit `info`, `preview` and `thumbnail` assets next to `data`.
    #[serde(rename = "AuxiliaryAssets", default = "default_true")]
    pub auxiliary_assets: bool,

    #[serde(rename = "TimeEntries", default)]
    pub time_entries: Option<Vec<TimeEntry>>,
}

fn default_true() -> bool {
    true
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            name: None,
            endpoint: None,
            s3_bucket: None,
            s3_key: None,
            cog_url: None,
            bands: None,
            rescale: None,
            reproject: None,
            bbox: None,
            datetime: None,
            data_projection: None,
            title: None,
            strategy: Strategy::default(),
            link_placement: LinkPlacement::default(),
            auxiliary_assets: true,
            time_entries: None,
        }
    }
}

/// One timestamp of the series and what to attach for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(rename = "Time", default)]
    pub time: Option<String>,

    /// Object key of this entry's source raster, in the endpoint bucket.
    #[serde(rename = "S3Key", default)]
    pub s3_key: Option<String>,

    /// Full URL of this entry's source raster.
    #[serde(rename = "Url", default)]
    pub url: Option<String>,

    #[serde(rename = "Assets", default)]
    pub assets: Vec<AssetSpec>,

    #[serde(rename = "Links", default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSpec {
    #[serde(rename = "Identifier", default = "default_asset_identifier")]
    pub identifier: String,

    #[serde(rename = "File", default)]
    pub file: Option<String>,

    #[serde(rename = "Type", default)]
    pub media_type: Option<String>,

    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

fn default_asset_identifier() -> String {
    "data".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkSpec {
    #[serde(rename = "Relation", default)]
    pub relation: Option<String>,

    #[serde(rename = "URL", default)]
    pub url: Option<String>,

    #[serde(rename = "Type", default)]
    pub media_type: Option<String>,

    #[serde(rename = "Title", default)]
    pub title: Option<String>,
}

/// Where the raster behind a tile URL lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocator {
    /// `s3://bucket/key`
    ObjectStore { bucket: String, key: String },
    /// Any absolute URL.
    Url(String),
    /// Placeholder filled in by the viewer, embedded verbatim.
    Template(String),
}

impl AssetLocator {
    /// Classify a configured source string.
    pub fn from_source(source: &str) -> Self {
        if source.contains("://") {
            AssetLocator::Url(source.to_string())
        } else {
            AssetLocator::Template(source.to_string())
        }
    }

    /// The locator as a URL or template string, before encoding.
    pub fn as_source(&self) -> String {
        match self {
            AssetLocator::ObjectStore { bucket, key } => format!("s3://{}/{}", bucket, key),
            AssetLocator::Url(url) => url.clone(),
            AssetLocator::Template(template) => template.clone(),
        }
    }

    /// Whether the source must be percent-encoded to sit in a query value.
    pub fn is_url(&self) -> bool {
        !matches!(self, AssetLocator::Template(_))
    }
}

/// Rendering parameters shared by every tile URL of an endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub bands: Vec<u32>,
    pub rescale: Option<[f64; 2]>,
    pub reproject: Option<String>,
}

impl EndpointConfig {
    /// Check required fields before anything is mutated.
    pub fn validate(&self) -> EnrichResult<()> {
        let entries = self.time_entries.as_deref().unwrap_or_default();

        let needs_object_store =
            self.s3_key.is_some() || entries.iter().any(|e| e.s3_key.is_some());
        let needs_endpoint = needs_object_store
            || self.cog_url.is_some()
            || entries.iter().any(|e| e.url.is_some());

        if needs_endpoint && self.base_url().is_none() {
            return Err(EnrichError::MissingField("EndPoint"));
        }
        if needs_object_store && self.s3_bucket.as_deref().map_or(true, str::is_empty) {
            return Err(EnrichError::MissingField("S3Bucket"));
        }

        if let Some(bands) = &self.bands {
            if let Some(bad) = bands.iter().find(|b| **b == 0) {
                return Err(EnrichError::InvalidField {
                    field: "Bands",
                    message: format!("band indexes are 1-based, got {}", bad),
                });
            }
        }

        if let Some([min, max]) = self.rescale {
            if !min.is_finite() || !max.is_finite() {
                return Err(EnrichError::InvalidField {
                    field: "Rescale",
                    message: format!("expected two finite numbers, got [{}, {}]", min, max),
                });
            }
        }

        Ok(())
    }

    /// Base URL with any trailing slash removed; `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(|e| e.trim().trim_end_matches('/'))
            .filter(|e| !e.is_empty())
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox.unwrap_or_default()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            bands: self.bands.clone().unwrap_or_default(),
            rescale: self.rescale,
            reproject: self.reproject.clone().filter(|r| !r.is_empty()),
        }
    }

    /// Endpoint-level source used when an entry names none.
    pub fn default_locator(&self) -> Option<AssetLocator> {
        if let (Some(bucket), Some(key)) = (&self.s3_bucket, &self.s3_key) {
            return Some(AssetLocator::ObjectStore {
                bucket: bucket.clone(),
                key: key.clone(),
            });
        }
        self.cog_url.as_deref().map(AssetLocator::from_source)
    }

    /// Source raster for one entry: its own `Url` or `S3Key`, else the
    /// endpoint default.
    pub fn locator_for(&self, entry: &TimeEntry) -> Option<AssetLocator> {
        if let Some(url) = &entry.url {
            return Some(AssetLocator::from_source(url));
        }
        if let (Some(bucket), Some(key)) = (&self.s3_bucket, &entry.s3_key) {
            return Some(AssetLocator::ObjectStore {
                bucket: bucket.clone(),
                key: key.clone(),
            });
        }
        self.default_locator()
    }

    /// Entries to process, in declared order.
    ///
    /// Without `TimeEntries`, a single implicit entry is produced when a
    /// `DateTime` or an endpoint-level source is configured.
    pub fn entries(&self) -> Vec<TimeEntry> {
        if let Some(entries) = &self.time_entries {
            return entries.clone();
        }
        if self.datetime.is_none() && self.default_locator().is_none() {
            return Vec::new();
        }
        vec![TimeEntry {
            time: Some(
                self.datetime
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DATETIME.to_string()),
            ),
            ..TimeEntry::default()
        }]
    }

    pub fn tile_title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TILE_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(yaml: &str) -> EndpointConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = endpoint("Name: empty");
        assert_eq!(config.strategy, Strategy::Rebuild);
        assert_eq!(config.link_placement, LinkPlacement::Item);
        assert!(config.auxiliary_assets);
        assert_eq!(config.bbox(), BoundingBox::default());
        assert!(config.entries().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parses_time_series_fixture() {
        let config = endpoint(test_utils::TIME_SERIES_ENDPOINT_YAML);
        assert_eq!(config.base_url(), Some("https://titiler.example.com"));
        assert_eq!(config.bands, Some(vec![1, 2, 3]));
        assert_eq!(config.rescale, Some([-50.0, 350.0]));
        assert_eq!(config.data_projection, Some(4326));
        assert_eq!(config.entries().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strategy_and_placement_keys() {
        let config = endpoint("Strategy: merge\nLinkPlacement: collection\nAuxiliaryAssets: false");
        assert_eq!(config.strategy, Strategy::Merge);
        assert_eq!(config.link_placement, LinkPlacement::Collection);
        assert!(!config.auxiliary_assets);
    }

    #[test]
    fn test_missing_endpoint_is_fatal() {
        let config = endpoint("S3Bucket: b\nS3Key: k.tif");
        assert!(matches!(
            config.validate(),
            Err(EnrichError::MissingField("EndPoint"))
        ));
    }

    #[test]
    fn test_entry_key_requires_bucket() {
        let config = endpoint(
            "EndPoint: https://t\nTimeEntries:\n  - Time: \"2020-10-30T18:21:38Z\"\n    S3Key: k.tif",
        );
        assert!(matches!(
            config.validate(),
            Err(EnrichError::MissingField("S3Bucket"))
        ));
    }

    #[test]
    fn test_zero_band_is_invalid() {
        let config = endpoint("Bands: [0, 1]");
        assert!(matches!(
            config.validate(),
            Err(EnrichError::InvalidField { field: "Bands", .. })
        ));
    }

    #[test]
    fn test_rescale_needs_two_values() {
        let result: Result<EndpointConfig, _> = serde_yaml::from_str("Rescale: [1, 2, 3]");
        assert!(result.is_err());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = endpoint("EndPoint: https://titiler.example.com/");
        assert_eq!(config.base_url(), Some("https://titiler.example.com"));
    }

    #[test]
    fn test_implicit_entry_from_locator() {
        let config = endpoint("EndPoint: https://t\nS3Bucket: b\nS3Key: k.tif");
        let entries = config.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].time.as_deref(), Some(DEFAULT_DATETIME));
        assert_eq!(
            config.locator_for(&entries[0]),
            Some(AssetLocator::ObjectStore {
                bucket: "b".to_string(),
                key: "k.tif".to_string()
            })
        );
    }

    #[test]
    fn test_entry_locator_precedence() {
        let config = endpoint("EndPoint: https://t\nS3Bucket: b\nCOG_URL: \"{cog_url}\"");
        let own_url = TimeEntry {
            url: Some("https://data.example.com/a.tif".to_string()),
            s3_key: Some("ignored.tif".to_string()),
            ..TimeEntry::default()
        };
        let own_key = TimeEntry {
            s3_key: Some("b.tif".to_string()),
            ..TimeEntry::default()
        };
        let nothing = TimeEntry::default();

        assert_eq!(
            config.locator_for(&own_url),
            Some(AssetLocator::Url("https://data.example.com/a.tif".to_string()))
        );
        assert_eq!(
            config.locator_for(&own_key).map(|l| l.as_source()),
            Some("s3://b/b.tif".to_string())
        );
        assert_eq!(
            config.locator_for(&nothing),
            Some(AssetLocator::Template("{cog_url}".to_string()))
        );
    }

    #[test]
    fn test_asset_identifier_default() {
        let entry: TimeEntry =
            serde_yaml::from_str("Time: t\nAssets:\n  - File: s3://b/k.tif").unwrap();
        assert_eq!(entry.assets[0].identifier, "data");
    }
}
