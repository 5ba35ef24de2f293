//! Tile-service links and time-indexed items for catalog collections.
//!
//! A run takes an [`EndpointConfig`] describing a tile service and a list
//! of [`TimeEntry`]s, and either rebuilds a collection's items from it or
//! decorates items that already exist:
//!
//! ```text
//! config ──► Reconciler ──► (TileUrlSpec ► synthesize) per entry
//!                │
//!                ▼
//!        ReconcileOutcome ──► aggregate_extent ──► collection
//! ```
//!
//! # Example
//!
//! ```rust
//! use catalog_common::Collection;
//! use tile_catalog::{enrich, CatalogConfig, CollectionConfig, EndpointConfig, TimeEntry};
//!
//! let endpoint = EndpointConfig {
//!     endpoint: Some("https://titiler.example.com".to_string()),
//!     s3_bucket: Some("earthdaily-demo".to_string()),
//!     bands: Some(vec![1, 2, 3]),
//!     rescale: Some([-50.0, 350.0]),
//!     time_entries: Some(vec![TimeEntry {
//!         time: Some("2020-10-30T18:21:38Z".to_string()),
//!         s3_key: Some("yuma/RGB.tif".to_string()),
//!         ..TimeEntry::default()
//!     }]),
//!     ..EndpointConfig::default()
//! };
//!
//! let mut collection = Collection::new("yuma", "Yuma time series");
//! let report = enrich(
//!     &mut collection,
//!     &CatalogConfig::default(),
//!     &endpoint,
//!     &CollectionConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(report.created, ["2020-10-30T18:21:38Z"]);
//! ```

pub mod config;
pub mod error;
pub mod extent;
pub mod item_links;
pub mod overlay;
pub mod pipeline;
pub mod reconcile;
pub mod synth;
pub mod tile_url;

pub use config::{
    AssetLocator, AssetSpec, CatalogConfig, CollectionConfig, EndpointConfig, LinkPlacement,
    LinkSpec, RenderOptions, Strategy, TimeEntry,
};
pub use error::{EnrichError, EnrichResult};
pub use extent::{aggregate_extent, ExtentSummary};
pub use item_links::annotate_item_links;
pub use overlay::{attach_overlay, Overlay};
pub use pipeline::{enrich, EnrichReport};
pub use reconcile::{AppliedEntry, ReconcileOutcome, Reconciler, SkipReason, SkippedEntry};
pub use synth::{synthesize, LinkMetadata, SynthesizedTile};
pub use tile_url::{percent_encode, TileUrlSpec};
