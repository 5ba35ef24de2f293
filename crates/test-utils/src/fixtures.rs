//! Common test fixtures for tile-catalog tests.
//!
//! Values mirror the EarthDaily aircraft-detection demo collection the
//! handlers were first written for.

/// Common bounding box definitions for testing, as `[minx, miny, maxx, maxy]`.
pub mod bbox {
    /// Whole world
    pub const GLOBAL: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

    /// Yuma proving ground scene
    pub const YUMA: [f64; 4] = [-115.2, 32.0, -114.0, 33.2];

    /// Yuma airfield crop
    pub const YUMA_AIRFIELD: [f64; 4] = [-114.8, 32.4, -114.4, 32.8];
}

/// Acquisition timestamps.
pub mod times {
    pub const FIRST_PASS: &str = "2020-10-30T18:21:38Z";
    pub const FIRST_PASS_OFFSET: &str = "2020-10-30T18:21:38+00:00";
    pub const SECOND_PASS: &str = "2020-11-15T18:21:38Z";
    pub const THIRD_PASS: &str = "2020-12-01T18:21:38Z";
    pub const MALFORMED: &str = "2020-13-45T99:99:99Z";
}

/// Tile service and object store locations.
pub mod endpoints {
    pub const TITILER: &str = "https://titiler.example.com";
    pub const BUCKET: &str = "earthdaily-demo";
    pub const FIRST_KEY: &str = "yuma/20201030-182138/RGB.tif";
    pub const SECOND_KEY: &str = "yuma/20201115-182138/RGB.tif";
}

/// Endpoint configuration with two time entries that each name their own COG.
pub const TIME_SERIES_ENDPOINT_YAML: &str = r#"
Name: TiTiler
EndPoint: https://titiler.example.com
S3Bucket: earthdaily-demo
Bands: [1, 2, 3]
Rescale: [-50, 350]
Reproject: bilinear
Bbox: [-115.2, 32.0, -114.0, 33.2]
DataProjection: 4326
TimeEntries:
  - Time: "2020-10-30T18:21:38Z"
    S3Key: yuma/20201030-182138/RGB.tif
  - Time: "2020-11-15T18:21:38Z"
    S3Key: yuma/20201115-182138/RGB.tif
"#;

/// Endpoint configuration carrying only pre-built links and source files.
pub const LINKS_ONLY_ENDPOINT_YAML: &str = r#"
Name: Links
Bbox: [-115.2, 32.0, -114.0, 33.2]
TimeEntries:
  - Time: "2020-10-30T18:21:38Z"
    Assets:
      - Identifier: rgb
        File: s3://earthdaily-demo/yuma/20201030-182138/RGB.tif
    Links:
      - Relation: xyz
        URL: https://tiles.example.com/a/{z}/{x}/{y}.png
        Title: First pass
  - Time: "2020-11-15T18:21:38Z"
    Links:
      - Relation: xyz
        URL: https://tiles.example.com/b/{z}/{x}/{y}.png
        Type: image/webp
"#;

/// Collection configuration with a GeoJSON overlay.
pub const OVERLAY_COLLECTION_YAML: &str = r#"
Name: aircraft_detection
Title: Aircraft detection
geojson_source: detections.geojson
overlay_visible: true
"#;

/// A small GeoJSON document for overlay copies.
pub const DETECTIONS_GEOJSON: &str =
    r#"{"type":"FeatureCollection","features":[]}"#;
