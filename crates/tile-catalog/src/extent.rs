//! Collection extent and time series markers.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tracing::info;

use catalog_common::{format_instant, BoundingBox, Collection, SpatialExtent, TemporalExtent};

use crate::reconcile::ReconcileOutcome;

/// STAC timeseries extension schema.
pub const TIMESERIES_EXTENSION: &str =
    "https://stac-extensions.github.io/timeseries/v1.0.0/schema.json";

pub const TIME_SERIES_KEY: &str = "time_series";
pub const COLLECTION_TYPE_KEY: &str = "collection_type";
pub const TS_DATES_KEY: &str = "ts:dates";

/// What was written onto the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtentSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// `None` when the spatial extent was left as it was.
    pub bbox: Option<BoundingBox>,
    /// More than one instant, so time series markers were set.
    pub time_series: bool,
}

/// Fold the applied entries into the collection extent.
///
/// Temporal extent becomes the single interval `[min, max]` of the applied
/// instants. Spatial extent is `configured_bbox` when given, else the bbox
/// of the first applied item; without either it is not touched. Nothing is
/// changed when no entry was applied.
pub fn aggregate_extent(
    collection: &mut Collection,
    outcome: &ReconcileOutcome,
    configured_bbox: Option<BoundingBox>,
) -> Option<ExtentSummary> {
    let start = outcome.instants().min()?;
    let end = outcome.instants().max()?;

    let bbox = configured_bbox.or_else(|| outcome.applied.iter().find_map(|a| a.bbox));

    collection.extent.temporal = TemporalExtent::single(start, end);
    if let Some(bbox) = bbox {
        collection.extent.spatial = SpatialExtent::single(bbox);
    }
    info!(
        collection = %collection.id,
        start = %format_instant(&start),
        end = %format_instant(&end),
        bbox = ?bbox.map(|b| b.to_array()),
        "Set collection extent"
    );

    let time_series = outcome.applied.len() > 1;
    if time_series {
        let times: Vec<&str> = outcome.applied.iter().map(|a| a.time.as_str()).collect();
        collection.extra.insert(
            TIME_SERIES_KEY.to_string(),
            Value::Array(times.iter().map(|t| json!({ "time": t })).collect()),
        );
        collection
            .extra
            .insert(COLLECTION_TYPE_KEY.to_string(), json!("timeseries"));
        collection.extra.insert(TS_DATES_KEY.to_string(), json!(times));
        collection.add_extension(TIMESERIES_EXTENSION);
        info!(collection = %collection.id, dates = times.len(), "Marked collection as time series");
    }

    Some(ExtentSummary {
        start,
        end,
        bbox,
        time_series,
    })
}

/// Remove time series markers left by an earlier run.
pub fn clear_time_series_markers(collection: &mut Collection) {
    for key in [TIME_SERIES_KEY, COLLECTION_TYPE_KEY, TS_DATES_KEY] {
        collection.extra.remove(key);
    }
    collection.stac_extensions.retain(|e| e != TIMESERIES_EXTENSION);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::AppliedEntry;
    use catalog_common::normalize_timestamp;
    use test_utils::times;

    fn applied(times: &[&str]) -> ReconcileOutcome {
        ReconcileOutcome {
            applied: times
                .iter()
                .map(|t| AppliedEntry {
                    time: t.to_string(),
                    instant: normalize_timestamp(t).unwrap(),
                    bbox: None,
                })
                .collect(),
            ..ReconcileOutcome::default()
        }
    }

    #[test]
    fn test_interval_is_min_max_regardless_of_order() {
        let mut collection = Collection::new("yuma", "");
        let outcome = applied(&[times::SECOND_PASS, times::THIRD_PASS, times::FIRST_PASS]);
        let bbox = BoundingBox::from_slice(&test_utils::bbox::YUMA).unwrap();

        let summary = aggregate_extent(&mut collection, &outcome, Some(bbox)).unwrap();
        assert_eq!(summary.start, normalize_timestamp(times::FIRST_PASS).unwrap());
        assert_eq!(summary.end, normalize_timestamp(times::THIRD_PASS).unwrap());
        assert_eq!(
            collection.extent.temporal.interval,
            vec![[Some(summary.start), Some(summary.end)]]
        );
        assert_eq!(collection.extent.spatial.bbox, vec![bbox]);
    }

    #[test]
    fn test_markers_keep_declared_order() {
        let mut collection = Collection::new("yuma", "");
        let outcome = applied(&[times::SECOND_PASS, times::FIRST_PASS]);
        aggregate_extent(&mut collection, &outcome, None);

        assert_eq!(
            collection.extra[TIME_SERIES_KEY],
            json!([{"time": times::SECOND_PASS}, {"time": times::FIRST_PASS}])
        );
        assert_eq!(collection.extra[COLLECTION_TYPE_KEY], "timeseries");
        assert_eq!(collection.extra[TS_DATES_KEY], json!([times::SECOND_PASS, times::FIRST_PASS]));
        assert_eq!(collection.stac_extensions, [TIMESERIES_EXTENSION]);
    }

    #[test]
    fn test_single_instant_is_not_a_time_series() {
        let mut collection = Collection::new("yuma", "");
        let summary = aggregate_extent(&mut collection, &applied(&[times::FIRST_PASS]), None).unwrap();
        assert!(!summary.time_series);
        assert_eq!(summary.start, summary.end);
        assert!(!collection.extra.contains_key(TIME_SERIES_KEY));
    }

    #[test]
    fn test_spatial_extent_kept_without_any_bbox() {
        let mut collection = Collection::new("yuma", "");
        let existing = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        collection.extent.spatial = SpatialExtent::single(existing);

        let summary = aggregate_extent(&mut collection, &applied(&[times::FIRST_PASS]), None).unwrap();

        assert!(summary.bbox.is_none());
        assert_eq!(collection.extent.spatial.bbox, vec![existing]);
        assert_eq!(
            collection.extent.temporal.interval,
            vec![[Some(summary.start), Some(summary.end)]]
        );
    }

    #[test]
    fn test_nothing_applied_leaves_extent() {
        let mut collection = Collection::new("yuma", "");
        let before = collection.extent.clone();
        assert!(aggregate_extent(&mut collection, &ReconcileOutcome::default(), None).is_none());
        assert_eq!(collection.extent, before);
    }

    #[test]
    fn test_rerun_is_stable() {
        let mut collection = Collection::new("yuma", "");
        let outcome = applied(&[times::FIRST_PASS, times::SECOND_PASS]);
        aggregate_extent(&mut collection, &outcome, None);
        let first = collection.clone();
        aggregate_extent(&mut collection, &outcome, None);
        assert_eq!(collection, first);
    }

    #[test]
    fn test_item_bbox_used_without_configured_bbox() {
        let mut collection = Collection::new("yuma", "");
        let mut outcome = applied(&[times::FIRST_PASS]);
        let item_bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        outcome.applied[0].bbox = Some(item_bbox);
        let summary = aggregate_extent(&mut collection, &outcome, None).unwrap();
        assert_eq!(summary.bbox, Some(item_bbox));
        assert_eq!(collection.extent.spatial.bbox, vec![item_bbox]);
    }

    #[test]
    fn test_clear_markers() {
        let mut collection = Collection::new("yuma", "");
        aggregate_extent(&mut collection, &applied(&[times::FIRST_PASS, times::SECOND_PASS]), None);
        clear_time_series_markers(&mut collection);
        assert!(collection.extra.is_empty());
        assert!(collection.stac_extensions.is_empty());
    }
}
