//! Reading and writing a collection directory.
//!
//! Layout: `<dir>/collection.json` plus one document per item at the path
//! its `item` link names (`./<id>/<id>.json` for items added here). Items
//! are written back where they were read from.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::collection::{href_names_item, Collection};
use crate::error::{CatalogError, CatalogResult};
use crate::item::Item;
use crate::rel;

/// File name of the collection document inside a collection directory.
pub const COLLECTION_FILE: &str = "collection.json";

/// Load a collection and every item its `item` links reference.
pub fn read_collection_dir(dir: impl AsRef<Path>) -> CatalogResult<Collection> {
    let dir = dir.as_ref();
    let path = dir.join(COLLECTION_FILE);
    if !path.exists() {
        return Err(CatalogError::MissingFile(path.display().to_string()));
    }

    let content = fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
    let mut collection: Collection = serde_json::from_str(&content)?;

    let mut items = Vec::new();
    for link in collection.links.iter_mut().filter(|l| l.rel == rel::ITEM) {
        let item_path = dir.join(relative_path(&link.href));
        let content =
            fs::read_to_string(&item_path).map_err(|e| CatalogError::io(&item_path, e))?;
        let item: Item = serde_json::from_str(&content)?;

        // an item link must name `<id>.json`
        if !href_names_item(&link.href, &item.id) {
            let href = Collection::item_href(&item.id);
            debug!(item_id = %item.id, from = %link.href, to = %href, "Relocated item link");
            link.href = href;
        }

        debug!(item_id = %item.id, path = %item_path.display(), "Loaded item");
        items.push(item);
    }
    collection.items = items;

    info!(
        collection = %collection.id,
        items = collection.items.len(),
        "Loaded collection"
    );
    Ok(collection)
}

/// Write a collection and its items, creating directories as needed.
pub fn write_collection_dir(collection: &Collection, dir: impl AsRef<Path>) -> CatalogResult<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| CatalogError::io(dir, e))?;

    let path = dir.join(COLLECTION_FILE);
    let json = serde_json::to_string_pretty(collection)?;
    fs::write(&path, json).map_err(|e| CatalogError::io(&path, e))?;

    for item in &collection.items {
        let href = collection
            .item_link_href(&item.id)
            .map(str::to_string)
            .unwrap_or_else(|| Collection::item_href(&item.id));
        let item_path = dir.join(relative_path(&href));
        if let Some(parent) = item_path.parent() {
            fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(item)?;
        fs::write(&item_path, json).map_err(|e| CatalogError::io(&item_path, e))?;
    }

    info!(
        collection = %collection.id,
        items = collection.items.len(),
        dir = %dir.display(),
        "Wrote collection"
    );
    Ok(())
}

fn relative_path(href: &str) -> &str {
    href.trim_start_matches("./")
}
