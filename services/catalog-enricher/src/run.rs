//! One enricher run: load, enrich, write.

use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_common::{read_collection_dir, write_collection_dir, Collection};
use tile_catalog::{enrich, CatalogConfig, CollectionConfig, EnrichReport, Strategy};
use tracing::info;

use crate::config_loader::{load_catalog_config, load_collection_config, load_endpoint_config};

/// Id of a new collection when the collection config has no `Name`.
const DEFAULT_COLLECTION_ID: &str = "collection";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub endpoint: PathBuf,
    pub collection: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    /// Existing collection directory; a new collection is created when unset.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    /// Overrides the endpoint's `Strategy`.
    pub strategy: Option<Strategy>,
}

pub fn run(options: &RunOptions) -> Result<EnrichReport> {
    let mut endpoint = load_endpoint_config(&options.endpoint)?;
    if let Some(strategy) = options.strategy {
        endpoint.strategy = strategy;
    }

    let collection_config = match &options.collection {
        Some(path) => load_collection_config(path)?,
        None => CollectionConfig::default(),
    };
    let catalog_config = match &options.catalog {
        Some(path) => load_catalog_config(path)?,
        None => CatalogConfig::default(),
    };

    let mut collection = match &options.input {
        Some(dir) => read_collection_dir(dir)
            .with_context(|| format!("Failed to read collection from {:?}", dir))?,
        None => new_collection(&collection_config),
    };
    info!(
        collection = %collection.id,
        items = collection.items.len(),
        strategy = ?endpoint.strategy,
        "Loaded collection"
    );

    let report = enrich(&mut collection, &catalog_config, &endpoint, &collection_config)
        .with_context(|| format!("Failed to enrich collection {}", collection.id))?;

    write_collection_dir(&collection, &options.output)
        .with_context(|| format!("Failed to write collection to {:?}", options.output))?;

    Ok(report)
}

fn new_collection(config: &CollectionConfig) -> Collection {
    let id = config.name.as_deref().unwrap_or(DEFAULT_COLLECTION_ID);
    let description = config
        .description
        .as_deref()
        .or(config.title.as_deref())
        .unwrap_or_default();

    let collection = Collection::new(id, description);
    match &config.title {
        Some(title) => collection.with_title(title),
        None => collection,
    }
}
