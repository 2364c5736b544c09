//! Presentation adapter
//!
//! Reshapes aggregate output into flat, ordered chart series. Nothing here
//! computes statistics; every value is taken from a bucket or correlation
//! produced upstream, so a charting layer can consume the points without
//! knowing any domain rules.

use std::collections::BTreeMap;

use crate::types::{AggregateBucket, SeriesPoint, TagCorrelation};

/// Chronological mean-per-date series from date buckets.
pub fn timeline_series(buckets: &BTreeMap<String, AggregateBucket>) -> Vec<SeriesPoint> {
    buckets
        .values()
        .map(|bucket| SeriesPoint {
            label: bucket.key.clone(),
            value: bucket.mean(),
            count: bucket.count,
        })
        .collect()
}

/// Mean-per-tag series, preserving the correlation order (descending by
/// mean, tag-name tiebreak).
pub fn tag_series(correlations: &[TagCorrelation]) -> Vec<SeriesPoint> {
    correlations
        .iter()
        .map(|c| SeriesPoint {
            label: c.tag.clone(),
            value: c.mean,
            count: c.count,
        })
        .collect()
}

/// Mean-per-slot series in Morning → Night order.
pub fn time_of_day_series(buckets: &[AggregateBucket]) -> Vec<SeriesPoint> {
    buckets
        .iter()
        .map(|bucket| SeriesPoint {
            label: bucket.key.clone(),
            value: bucket.mean(),
            count: bucket.count,
        })
        .collect()
}

/// Count-per-level series from a zero-filled mood distribution.
///
/// The plotted value is the count, not the mean, so empty levels render as
/// zero bars rather than vanishing.
pub fn distribution_series(buckets: &[AggregateBucket]) -> Vec<SeriesPoint> {
    buckets
        .iter()
        .map(|bucket| SeriesPoint {
            label: bucket.key.clone(),
            value: bucket.count as f64,
            count: bucket.count,
        })
        .collect()
}
