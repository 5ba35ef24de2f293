//! Per-item metadata copied onto the collection's `item` links.

use serde_json::json;
use tracing::debug;

use catalog_common::{format_instant, Collection};

use crate::synth::{DATA_ASSET, INFO_ASSET, PREVIEW_ASSET, THUMBNAIL_ASSET};

/// Asset keys produced from the tile service rather than configured.
const SYNTHESIZED_ASSETS: [&str; 4] = [DATA_ASSET, INFO_ASSET, PREVIEW_ASSET, THUMBNAIL_ASSET];

/// Copy each item's datetime and source asset hrefs onto its `item` link.
///
/// Viewers read these to build a time slider without opening every item.
/// Only source assets are listed; tile-service assets are left out.
/// Returns how many links were annotated.
pub fn annotate_item_links(collection: &mut Collection) -> usize {
    let mut annotated = 0;

    for index in 0..collection.items.len() {
        let item = &collection.items[index];
        let Some(position) = collection.item_link_position(&item.id) else {
            continue;
        };

        let datetime = item.datetime().map(|d| format_instant(&d));
        let hrefs: Vec<String> = item
            .assets
            .iter()
            .filter(|(key, _)| !SYNTHESIZED_ASSETS.contains(&key.as_str()))
            .map(|(_, asset)| asset.href.clone())
            .collect();
        debug!(item_id = %item.id, "Annotated item link");

        let link = &mut collection.links[position];
        if let Some(datetime) = datetime {
            link.extra.insert("datetime".to_string(), json!(datetime));
        }
        if !hrefs.is_empty() {
            link.extra.insert("assets".to_string(), json!(hrefs));
        }
        annotated += 1;
    }

    annotated
}
