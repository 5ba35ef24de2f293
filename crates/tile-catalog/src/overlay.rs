//! GeoJSON overlays published next to the catalog.

use std::fs;
use std::path::Path;

use catalog_common::Collection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::{CatalogConfig, CollectionConfig};
use crate::error::{EnrichError, EnrichResult};

pub const OVERLAYS_KEY: &str = "overlays";

/// An overlay layer record as viewers read it from the collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overlay {
    pub id: String,
    pub name: String,
    pub url: String,
    pub protocol: String,
    pub visible: bool,
    pub style: Value,
}

fn default_style() -> Value {
    json!({
        "fillColor": "#ff7800",
        "fillOpacity": 0.7,
        "color": "#000",
        "weight": 2,
        "opacity": 1
    })
}

/// Copy the configured GeoJSON into the build tree and register it.
///
/// Returns the overlay added, or `None` when no source is configured or
/// the source file does not exist (logged, collection unchanged).
pub fn attach_overlay(
    collection: &mut Collection,
    catalog: &CatalogConfig,
    config: &CollectionConfig,
) -> EnrichResult<Option<Overlay>> {
    let Some(source) = config.geojson_source.as_deref() else {
        return Ok(None);
    };

    if !source.exists() {
        warn!(source = %source.display(), "GeoJSON overlay file not found, skipped");
        return Ok(None);
    }

    let Some(file_name) = source.file_name().and_then(|n| n.to_str()) else {
        return Err(EnrichError::InvalidField {
            field: "geojson_source",
            message: format!("{} has no file name", source.display()),
        });
    };

    let data_dir = catalog.build_dir.join(&catalog.id).join("data");
    fs::create_dir_all(&data_dir).map_err(|e| io_error(&data_dir, e))?;
    let destination = data_dir.join(file_name);
    fs::copy(source, &destination).map_err(|e| io_error(source, e))?;
    info!(
        source = %source.display(),
        destination = %destination.display(),
        "Copied GeoJSON overlay"
    );

    let name = config.name.as_deref();
    let overlay = Overlay {
        id: format!("{}_geojson", name.unwrap_or("overlay")),
        name: config
            .overlay_name
            .clone()
            .unwrap_or_else(|| format!("{} Overlay", name.unwrap_or("Data"))),
        url: format!("data/{}", file_name),
        protocol: "geojson".to_string(),
        visible: config.overlay_visible,
        style: config.overlay_style.clone().unwrap_or_else(default_style),
    };

    push_overlay(collection, &overlay)?;
    Ok(Some(overlay))
}

fn push_overlay(collection: &mut Collection, overlay: &Overlay) -> EnrichResult<()> {
    let value = serde_json::to_value(overlay).map_err(catalog_common::CatalogError::from)?;
    let list = collection
        .extra
        .entry(OVERLAYS_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));

    match list {
        Value::Array(entries) => {
            entries.retain(|e| e.get("id") != Some(&Value::String(overlay.id.clone())));
            entries.push(value);
            Ok(())
        }
        _ => Err(EnrichError::InvalidField {
            field: OVERLAYS_KEY,
            message: "collection overlays is not a list".to_string(),
        }),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> EnrichError {
    EnrichError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use test_utils::{scratch_dir, write_fixture, DETECTIONS_GEOJSON};

    fn overlays(collection: &Collection) -> Vec<Overlay> {
        serde_json::from_value(collection.extra[OVERLAYS_KEY].clone()).unwrap()
    }

    fn collection_config(source: PathBuf) -> CollectionConfig {
        CollectionConfig {
            name: Some("aircraft_detection".to_string()),
            geojson_source: Some(source),
            ..CollectionConfig::default()
        }
    }

    #[test]
    fn test_copies_and_registers_overlay() {
        let dir = scratch_dir();
        let source = write_fixture(dir.path(), "input/detections.geojson", DETECTIONS_GEOJSON);
        let catalog = CatalogConfig {
            id: "demo".to_string(),
            build_dir: dir.path().join("build"),
        };
        let mut collection = Collection::new("aircraft_detection", "");

        let overlay = attach_overlay(&mut collection, &catalog, &collection_config(source))
            .unwrap()
            .unwrap();

        let copied = dir.path().join("build/demo/data/detections.geojson");
        assert_eq!(fs::read_to_string(copied).unwrap(), DETECTIONS_GEOJSON);
        assert_eq!(overlay.id, "aircraft_detection_geojson");
        assert_eq!(overlay.name, "aircraft_detection Overlay");
        assert_eq!(overlay.url, "data/detections.geojson");
        assert_eq!(overlay.protocol, "geojson");
        assert!(!overlay.visible);
        assert_eq!(overlay.style["fillColor"], "#ff7800");
        assert_eq!(overlays(&collection), vec![overlay]);
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let dir = scratch_dir();
        let catalog = CatalogConfig {
            id: "demo".to_string(),
            build_dir: dir.path().join("build"),
        };
        let mut collection = Collection::new("aircraft_detection", "");
        let before = collection.clone();

        let result = attach_overlay(
            &mut collection,
            &catalog,
            &collection_config(dir.path().join("missing.geojson")),
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(collection, before);
        assert!(!dir.path().join("build").exists());
    }

    #[test]
    fn test_no_source_configured() {
        let mut collection = Collection::new("c", "");
        let result = attach_overlay(
            &mut collection,
            &CatalogConfig::default(),
            &CollectionConfig::default(),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_reattach_replaces_same_id() {
        let dir = scratch_dir();
        let source = write_fixture(dir.path(), "detections.geojson", DETECTIONS_GEOJSON);
        let catalog = CatalogConfig {
            id: "demo".to_string(),
            build_dir: dir.path().join("build"),
        };
        let mut config = collection_config(source);
        config.overlay_visible = true;
        config.overlay_name = Some("Detections".to_string());
        let mut collection = Collection::new("aircraft_detection", "");

        attach_overlay(&mut collection, &catalog, &config).unwrap();
        attach_overlay(&mut collection, &catalog, &config).unwrap();

        let registered = overlays(&collection);
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].name, "Detections");
        assert!(registered[0].visible);
    }
}
