//! Aggregation
//!
//! Pure, stateless transformations from an entry snapshot to bucketed
//! statistics. Given the same snapshot and key function the output is
//! byte-identical: buckets are kept in ordered maps and every sort has a
//! deterministic tiebreak. No hidden state influences any result here.
//!
//! Entries without a numeric view (journal notes) are skipped by the
//! numeric aggregations.

use std::collections::BTreeMap;

use chrono::Timelike;

use crate::error::CoreError;
use crate::types::{AggregateBucket, Entry, Goal, MetricSummary, TagCorrelation, TimeOfDay};
use crate::types::{mood_label, EntryValue, MOOD_MAX, MOOD_MIN};

/// Groups entries into buckets keyed by `key_fn`.
///
/// Only entries with a numeric value contribute; the returned map is
/// ordered by key.
pub fn group_by<K>(entries: &[&Entry], key_fn: K) -> BTreeMap<String, AggregateBucket>
where
    K: Fn(&Entry) -> String,
{
    let mut buckets: BTreeMap<String, AggregateBucket> = BTreeMap::new();
    for entry in entries {
        let Some(value) = entry.numeric() else {
            continue;
        };
        let key = key_fn(entry);
        let bucket = buckets
            .entry(key.clone())
            .or_insert_with(|| AggregateBucket::new(key));
        bucket.sum += value;
        bucket.count += 1;
    }
    buckets
}

/// Groups entries by calendar date (`YYYY-MM-DD` keys, chronological).
pub fn group_by_date(entries: &[&Entry]) -> BTreeMap<String, AggregateBucket> {
    group_by(entries, |entry| entry.date_key())
}

/// Groups entries into the four time-of-day buckets.
///
/// All four buckets are always present, in Morning → Night display order;
/// an untouched bucket has count 0 and therefore mean 0.
pub fn group_by_time_of_day(entries: &[&Entry]) -> Vec<AggregateBucket> {
    let mut buckets: Vec<AggregateBucket> = TimeOfDay::ALL
        .iter()
        .map(|slot| AggregateBucket::new(slot.as_str()))
        .collect();
    for entry in entries {
        let Some(value) = entry.numeric() else {
            continue;
        };
        let slot = TimeOfDay::from_hour(entry.timestamp.hour());
        let index = TimeOfDay::ALL
            .iter()
            .position(|s| *s == slot)
            .expect("every slot is in ALL");
        buckets[index].sum += value;
        buckets[index].count += 1;
    }
    buckets
}

/// Arithmetic mean, defined as 0.0 for an empty slice.
///
/// Callers that need to distinguish "no data" from "mean of zero" must
/// check the input length themselves.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Fraction of the goal target reached, clamped to [0, 1].
///
/// A non-positive or non-finite target is an input error, not a silent
/// zero.
pub fn goal_attainment_ratio(value: f64, goal: &Goal) -> Result<f64, CoreError> {
    if !goal.target.is_finite() || goal.target <= 0.0 {
        return Err(CoreError::InvalidGoal(goal.target));
    }
    Ok((value / goal.target).clamp(0.0, 1.0))
}

/// Mean value and count per tag, over the entries carrying that tag.
///
/// Tags from the universe with no matching entries are excluded rather
/// than zero-filled, so an unused activity never shows up as a misleading
/// zero average. Results are ordered descending by mean, with the tag name
/// as tiebreak.
pub fn correlate_by_tag(entries: &[&Entry], tag_universe: &[&str]) -> Vec<TagCorrelation> {
    let mut correlations: Vec<TagCorrelation> = Vec::new();
    for tag in tag_universe {
        let mut sum = 0.0;
        let mut count = 0usize;
        for entry in entries {
            if entry.tags.iter().any(|t| t == tag) {
                if let Some(value) = entry.numeric() {
                    sum += value;
                    count += 1;
                }
            }
        }
        if count > 0 {
            correlations.push(TagCorrelation {
                tag: tag.to_string(),
                mean: sum / count as f64,
                count,
            });
        }
    }
    correlations.sort_by(|a, b| {
        b.mean
            .partial_cmp(&a.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    correlations
}

/// Summary statistics for the samples of one metric against its goal.
pub fn metric_summary(entries: &[&Entry], goal: &Goal) -> Result<MetricSummary, CoreError> {
    if !goal.target.is_finite() || goal.target <= 0.0 {
        return Err(CoreError::InvalidGoal(goal.target));
    }

    let samples: Vec<f64> = entries
        .iter()
        .filter_map(|entry| match &entry.value {
            EntryValue::Measure { metric, value } if *metric == goal.metric => Some(*value),
            _ => None,
        })
        .collect();

    let total: f64 = samples.iter().sum();
    let goal_met = samples.iter().filter(|v| **v >= goal.target).count();

    Ok(MetricSummary {
        metric: goal.metric,
        total,
        average: mean(&samples),
        goal_met,
        sample_count: samples.len(),
    })
}

/// Entry count per mood level.
///
/// Unlike tag correlation this is zero-filled: all five levels are always
/// present (labelled 1 → 5) so a distribution chart keeps a stable shape.
pub fn mood_distribution(entries: &[&Entry]) -> Vec<AggregateBucket> {
    let mut buckets: Vec<AggregateBucket> = (MOOD_MIN..=MOOD_MAX)
        .map(|level| AggregateBucket::new(mood_label(level)))
        .collect();
    for entry in entries {
        if let EntryValue::Mood(level) = entry.value {
            if (MOOD_MIN..=MOOD_MAX).contains(&level) {
                let bucket = &mut buckets[(level - MOOD_MIN) as usize];
                bucket.sum += f64::from(level);
                bucket.count += 1;
            }
        }
    }
    buckets
}
