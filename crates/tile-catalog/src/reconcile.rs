//! Reconciliation of configured time entries against a collection.
//!
//! Two strategies exist. [`Strategy::Rebuild`] owns the time series: it
//! clears the collection and creates one item per entry, so running it
//! twice yields the same items. [`Strategy::Merge`] decorates items built
//! elsewhere: an entry applies to every item whose datetime is the same
//! instant, and entries without such an item are dropped. Links are
//! de-duplicated on attach, so merging twice does not duplicate them.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use catalog_common::{
    normalize_timestamp, rel, BoundingBox, Collection, Item, Link, TemporalExtent, TimeParseError,
};

use crate::config::{EndpointConfig, LinkPlacement, Strategy, TimeEntry};
use crate::error::EnrichResult;
use crate::extent;
use crate::synth::{self, ConfiguredLink, LinkMetadata, DATA_ASSET};
use crate::tile_url::TileUrlSpec;

/// An entry that produced or decorated at least one item.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEntry {
    /// Timestamp exactly as configured.
    pub time: String,
    pub instant: DateTime<Utc>,
    /// Bounding box of the first item the entry applied to.
    pub bbox: Option<BoundingBox>,
}

/// Why an entry was not applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingTime,
    InvalidTime(TimeParseError),
    /// Same instant as an earlier entry, whose raw time is given.
    DuplicateInstant(String),
    /// Merge only: no item has this entry's datetime.
    NoMatchingItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    /// Position in the configured list.
    pub index: usize,
    pub time: Option<String>,
    pub reason: SkipReason,
}

/// Result of one reconciliation pass, handed to extent aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Applied entries in declared order.
    pub applied: Vec<AppliedEntry>,
    pub skipped: Vec<SkippedEntry>,
    /// Ids of items created by this pass.
    pub created: Vec<String>,
    /// Ids of pre-existing items decorated by this pass.
    pub updated: Vec<String>,
    /// Tile links destined for the collection itself.
    pub collection_links: Vec<Link>,
}

impl ReconcileOutcome {
    pub fn instants(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.applied.iter().map(|a| a.instant)
    }
}

/// A time entry whose timestamp normalized successfully.
struct ParsedEntry<'a> {
    index: usize,
    entry: &'a TimeEntry,
    time: String,
    instant: DateTime<Utc>,
}

/// Applies an endpoint's time entries to a collection.
pub struct Reconciler<'a> {
    endpoint: &'a EndpointConfig,
    base_url: Option<&'a str>,
    bbox: BoundingBox,
    placement: LinkPlacement,
}

impl<'a> Reconciler<'a> {
    pub fn new(endpoint: &'a EndpointConfig) -> Self {
        Self {
            endpoint,
            base_url: endpoint.base_url(),
            bbox: endpoint.bbox(),
            placement: endpoint.link_placement,
        }
    }

    /// Run one pass with the given strategy.
    ///
    /// An empty entry list leaves the collection untouched, even for a
    /// rebuild.
    pub fn run(&self, collection: &mut Collection, strategy: Strategy) -> EnrichResult<ReconcileOutcome> {
        let entries = self.endpoint.entries();
        let mut outcome = ReconcileOutcome::default();

        if entries.is_empty() {
            warn!(collection = %collection.id, "No TimeEntries configured, collection left unchanged");
            return Ok(outcome);
        }

        let parsed = normalize_entries(&entries, &mut outcome.skipped);

        match strategy {
            Strategy::Rebuild => self.rebuild(collection, &parsed, &mut outcome),
            Strategy::Merge => self.merge(collection, &parsed, &mut outcome),
        }

        info!(
            collection = %collection.id,
            strategy = ?strategy,
            applied = outcome.applied.len(),
            created = outcome.created.len(),
            updated = outcome.updated.len(),
            skipped = outcome.skipped.len(),
            "Reconciled time entries"
        );
        Ok(outcome)
    }

    fn rebuild(&self, collection: &mut Collection, parsed: &[ParsedEntry<'_>], outcome: &mut ReconcileOutcome) {
        collection.clear_items();
        let removed = collection.remove_links(rel::CHILD);
        if self.placement == LinkPlacement::Collection {
            collection
                .links
                .retain(|l| !(l.rel == rel::XYZ && l.extra.contains_key("time")));
        }
        extent::clear_time_series_markers(collection);
        collection.extent.temporal = TemporalExtent::default();
        debug!(collection = %collection.id, child_links = removed, "Cleared collection for rebuild");

        for entry in parsed {
            let mut item = Item::new(entry.time.as_str())
                .with_bbox(self.bbox)
                .with_datetime(entry.instant);
            self.decorate(&mut item, entry, outcome);

            info!(item_id = %item.id, "Created item");
            outcome.created.push(item.id.clone());
            outcome.applied.push(AppliedEntry {
                time: entry.time.clone(),
                instant: entry.instant,
                bbox: item.bbox,
            });
            collection.add_item(item);
        }
    }

    fn merge(&self, collection: &mut Collection, parsed: &[ParsedEntry<'_>], outcome: &mut ReconcileOutcome) {
        let mut first_bbox: Vec<Option<Option<BoundingBox>>> = vec![None; parsed.len()];

        for item in collection.items.iter_mut() {
            let Some(datetime) = item.datetime() else {
                continue;
            };
            let Some(position) = parsed.iter().position(|p| p.instant == datetime) else {
                continue;
            };

            self.decorate(item, &parsed[position], outcome);
            debug!(item_id = %item.id, time = %parsed[position].time, "Decorated existing item");
            outcome.updated.push(item.id.clone());
            first_bbox[position].get_or_insert(item.bbox);
        }

        for (index, entry) in parsed.iter().enumerate() {
            match first_bbox[index] {
                Some(bbox) => outcome.applied.push(AppliedEntry {
                    time: entry.time.clone(),
                    instant: entry.instant,
                    bbox,
                }),
                None => {
                    debug!(time = %entry.time, "No item matches time entry, dropped");
                    outcome.skipped.push(SkippedEntry {
                        index: entry.index,
                        time: Some(entry.time.clone()),
                        reason: SkipReason::NoMatchingItem,
                    });
                }
            }
        }
    }

    /// Attach configured assets, the synthesized tile and configured links.
    ///
    /// The tile's `data` asset replaces a configured asset of the same key;
    /// a configured `xyz` link only provides `data` when no tile was
    /// synthesized for the entry.
    fn decorate(&self, item: &mut Item, entry: &ParsedEntry<'_>, outcome: &mut ReconcileOutcome) {
        let projection = self.endpoint.data_projection;
        let mut has_rendering_data = false;

        for spec in &entry.entry.assets {
            if let Some((key, asset)) = synth::configured_asset(spec) {
                item.add_asset(key, asset);
            }
        }

        if let Some(tile) = self.tile_for(entry.entry) {
            let meta = LinkMetadata {
                title: self.endpoint.tile_title(),
                media_type: catalog_common::media_types::PNG,
                projection,
            };
            let synthesized = synth::synthesize(&tile, &meta, self.endpoint.auxiliary_assets);
            for (key, asset) in synthesized.assets {
                item.add_asset(key, asset);
            }
            has_rendering_data = true;
            self.place_tile_link(item, synthesized.link, entry, outcome);
        }

        for spec in &entry.entry.links {
            match synth::configured_link(spec, projection) {
                Some(ConfiguredLink::Tile(link)) => {
                    if !has_rendering_data {
                        let media_type = link
                            .media_type
                            .clone()
                            .unwrap_or_else(|| catalog_common::media_types::PNG.to_string());
                        item.add_asset(DATA_ASSET, synth::data_asset(&link.href, &media_type));
                        has_rendering_data = true;
                    }
                    self.place_tile_link(item, link, entry, outcome);
                }
                Some(ConfiguredLink::Plain(link)) => {
                    item.add_link(link);
                }
                None => debug!(time = %entry.time, "Ignoring link without relation or URL"),
            }
        }
    }

    fn tile_for(&self, entry: &TimeEntry) -> Option<TileUrlSpec> {
        let base = self.base_url?;
        let locator = self.endpoint.locator_for(entry)?;
        Some(TileUrlSpec::build(base, &locator, &self.endpoint.render_options()))
    }

    fn place_tile_link(&self, item: &mut Item, link: Link, entry: &ParsedEntry<'_>, outcome: &mut ReconcileOutcome) {
        match self.placement {
            LinkPlacement::Item => {
                if item.add_link(link) {
                    debug!(item_id = %item.id, "Added tile link");
                }
            }
            LinkPlacement::Collection => {
                let link = link.with_field("time", entry.time.as_str());
                if !outcome.collection_links.iter().any(|l| l.same_target(&link)) {
                    outcome.collection_links.push(link);
                }
            }
        }
    }
}

/// Normalize timestamps, recording entries that cannot be used.
fn normalize_entries<'e>(entries: &'e [TimeEntry], skipped: &mut Vec<SkippedEntry>) -> Vec<ParsedEntry<'e>> {
    let mut parsed: Vec<ParsedEntry<'e>> = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let Some(raw) = entry.time.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            warn!(index, "Time entry has no Time, skipped");
            skipped.push(SkippedEntry {
                index,
                time: None,
                reason: SkipReason::MissingTime,
            });
            continue;
        };

        let instant = match normalize_timestamp(raw) {
            Ok(instant) => instant,
            Err(err) => {
                warn!(index, time = %raw, error = %err, "Unparsable time entry, skipped");
                skipped.push(SkippedEntry {
                    index,
                    time: Some(raw.to_string()),
                    reason: SkipReason::InvalidTime(err),
                });
                continue;
            }
        };

        if let Some(first) = parsed.iter().find(|p| p.instant == instant) {
            warn!(index, time = %raw, first = %first.time, "Duplicate time entry, skipped");
            skipped.push(SkippedEntry {
                index,
                time: Some(raw.to_string()),
                reason: SkipReason::DuplicateInstant(first.time.clone()),
            });
            continue;
        }

        parsed.push(ParsedEntry {
            index,
            entry,
            time: raw.to_string(),
            instant,
        });
    }

    parsed
}
