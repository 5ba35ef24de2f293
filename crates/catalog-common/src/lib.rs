//! Catalog object model shared by the tile-catalog crates.
//!
//! The types here follow the STAC 1.0 JSON layout closely enough to be read
//! by map viewers, while staying small: a [`Collection`] owns its [`Item`]s,
//! both carry [`Link`]s, items carry [`Asset`]s, and the collection
//! summarizes coverage in an [`Extent`].

pub mod asset;
pub mod bbox;
pub mod collection;
pub mod error;
pub mod io;
pub mod item;
pub mod link;
pub mod time;

pub use asset::Asset;
pub use bbox::{BboxParseError, BoundingBox};
pub use collection::{Collection, Extent, SpatialExtent, TemporalExtent};
pub use error::{CatalogError, CatalogResult};
pub use io::{read_collection_dir, write_collection_dir};
pub use item::{Geometry, Item};
pub use link::Link;
pub use time::{format_instant, normalize_timestamp, TimeParseError};

/// STAC version written on every serialized object.
pub const STAC_VERSION: &str = "1.0.0";

/// Media types used by tile links and assets.
pub mod media_types {
    /// PNG tiles and previews.
    pub const PNG: &str = "image/png";
    /// Cloud-optimized GeoTIFF source files.
    pub const GEOTIFF: &str = "image/tiff";
    /// JSON metadata documents.
    pub const JSON: &str = "application/json";
}

/// Link relation types used by the catalog.
pub mod rel {
    pub const XYZ: &str = "xyz";
    pub const ITEM: &str = "item";
    pub const CHILD: &str = "child";
    pub const ROOT: &str = "root";
    pub const PARENT: &str = "parent";
    pub const COLLECTION: &str = "collection";
}
