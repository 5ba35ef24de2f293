//! One enrichment run over one collection.

use catalog_common::Collection;
use tracing::{info, warn};

use crate::config::{CatalogConfig, CollectionConfig, EndpointConfig, Strategy};
use crate::error::EnrichResult;
use crate::extent::{self, ExtentSummary};
use crate::item_links;
use crate::overlay::{self, Overlay};
use crate::reconcile::{Reconciler, SkippedEntry};

/// Summary of what an enrichment run changed.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichReport {
    pub strategy: Strategy,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
    /// Tile links attached to the collection itself.
    pub collection_links: usize,
    pub extent: Option<ExtentSummary>,
    pub overlay: Option<Overlay>,
}

/// Decorate or rebuild `collection` from the endpoint's time entries.
///
/// Configuration is validated first; a configuration error leaves the
/// collection untouched. Steps: reconcile with the endpoint's strategy,
/// aggregate the extent, attach collection-level tile links, annotate
/// item links, then publish the overlay.
pub fn enrich(
    collection: &mut Collection,
    catalog: &CatalogConfig,
    endpoint: &EndpointConfig,
    collection_config: &CollectionConfig,
) -> EnrichResult<EnrichReport> {
    endpoint.validate()?;

    let strategy = endpoint.strategy;
    let outcome = Reconciler::new(endpoint).run(collection, strategy)?;

    let extent = extent::aggregate_extent(collection, &outcome, endpoint.bbox);

    let mut collection_links = 0;
    for link in outcome.collection_links.iter().cloned() {
        if collection.add_link(link) {
            collection_links += 1;
        }
    }

    item_links::annotate_item_links(collection);

    let overlay = overlay::attach_overlay(collection, catalog, collection_config)?;

    if !outcome.skipped.is_empty() {
        warn!(
            collection = %collection.id,
            skipped = outcome.skipped.len(),
            "Some time entries were not applied"
        );
    }
    info!(
        collection = %collection.id,
        endpoint = endpoint.name.as_deref().unwrap_or("unnamed"),
        items = collection.items.len(),
        collection_links,
        "Enrichment complete"
    );

    Ok(EnrichReport {
        strategy,
        created: outcome.created,
        updated: outcome.updated,
        skipped: outcome.skipped,
        collection_links,
        extent,
        overlay,
    })
}
