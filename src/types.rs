//! Core types for the wellspring analytics pipeline
//!
//! This module defines the data structures that flow through each stage:
//! entries and their domain payloads, aggregate buckets, goals, and the
//! derived shapes handed to insight generation and chart presentation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier assigned to an entry by its store.
///
/// Ids are a monotonically increasing counter, unique within one store.
pub type EntryId = u64;

/// Lowest valid mood level.
pub const MOOD_MIN: u8 = 1;
/// Highest valid mood level.
pub const MOOD_MAX: u8 = 5;

/// Display label for a mood level (1 = worst, 5 = best).
///
/// Levels outside 1..=5 never reach display code; they are rejected at the
/// store boundary.
pub fn mood_label(level: u8) -> &'static str {
    match level {
        1 => "Bad",
        2 => "Not great",
        3 => "Okay",
        4 => "Good",
        5 => "Excellent",
        _ => "Unknown",
    }
}

/// Tracked body metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Steps,
    Water,
    Sleep,
    Meditation,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Water => "water",
            Metric::Sleep => "sleep",
            Metric::Meditation => "meditation",
        }
    }

    /// Unit suffix used when rendering values of this metric.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Water => "L",
            Metric::Sleep => "hrs",
            Metric::Meditation => "min",
        }
    }
}

/// Domain payload of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryValue {
    /// Mood rating on the 1..=5 scale; the entry's tags are the activities
    /// engaged in during that period.
    Mood(u8),
    /// One numeric sample of a body metric (non-negative).
    Measure { metric: Metric, value: f64 },
    /// Free-form journal text; the entry's tags carry the single mood label.
    Journal {
        title: String,
        body: String,
        /// Optional image reference attached by the user.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
}

impl EntryValue {
    /// Numeric view of the payload, where one exists.
    ///
    /// Moods map to their level, measures to their sample value. Journal
    /// entries have no numeric interpretation and yield `None`.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            EntryValue::Mood(level) => Some(f64::from(*level)),
            EntryValue::Measure { value, .. } => Some(*value),
            EntryValue::Journal { .. } => None,
        }
    }
}

/// A single timestamped user-submitted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier
    pub id: EntryId,
    /// User wall-clock time of the entry. Entries may arrive out of order;
    /// no timezone conversion happens in the core.
    pub timestamp: NaiveDateTime,
    /// Domain payload
    pub value: EntryValue,
    /// Category labels (activities for moods, mood label for journal)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Optional free-text note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Entry {
    /// Calendar-date bucket key (`YYYY-MM-DD`).
    pub fn date_key(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }

    pub fn numeric(&self) -> Option<f64> {
        self.value.numeric()
    }
}

/// Target threshold for one metric
///
/// Owned by the caller and passed explicitly into aggregation; the core
/// keeps no goal state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub metric: Metric,
    /// Target value, must be positive and finite.
    pub target: f64,
}

/// A named group of entries with derived statistics
///
/// Pure view over a store snapshot; recomputed on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    /// Bucket key (date, tag, or time-of-day name)
    pub key: String,
    /// Sum of member numeric values
    pub sum: f64,
    /// Number of member entries
    pub count: usize,
}

impl AggregateBucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sum: 0.0,
            count: 0,
        }
    }

    /// Arithmetic mean of the bucket.
    ///
    /// Defined as 0.0 for an empty bucket so callers never divide by zero;
    /// `count` is the authority on whether the mean is real data.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Time-of-day classification bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Buckets in display order.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Classify an hour of day (0..=23).
    ///
    /// Boundaries are half-open and exhaustive: [5,12) Morning,
    /// [12,17) Afternoon, [17,22) Evening, everything else Night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=21 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

/// Per-tag correlation result: mean value and count over entries carrying
/// the tag. Tags with no matching entries are excluded, never zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagCorrelation {
    pub tag: String,
    pub mean: f64,
    pub count: usize,
}

/// Summary statistics for one metric over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    /// Sum of all samples
    pub total: f64,
    /// Mean sample value (0.0 when there are no samples)
    pub average: f64,
    /// Number of samples meeting or exceeding the goal target
    pub goal_met: usize,
    /// Number of samples considered
    pub sample_count: usize,
}

/// One point of a chart series produced by the presentation adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Axis label (date, tag, bucket name, or mood label)
    pub label: String,
    /// Plotted value (a mean or a count depending on the series)
    pub value: f64,
    /// Number of entries behind the point
    pub count: usize,
}

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Average,
    MostCommon,
    BestDay,
    WorstDay,
    BestTag,
    BestTimeOfDay,
}

/// A derived natural-language observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_time_of_day_total_and_non_overlapping() {
        for hour in 0..24 {
            let bucket = TimeOfDay::from_hour(hour);
            let expected = if (5..12).contains(&hour) {
                TimeOfDay::Morning
            } else if (12..17).contains(&hour) {
                TimeOfDay::Afternoon
            } else if (17..22).contains(&hour) {
                TimeOfDay::Evening
            } else {
                TimeOfDay::Night
            };
            assert_eq!(bucket, expected, "hour {hour}");
        }
    }

    #[test]
    fn test_empty_bucket_mean_is_zero() {
        let bucket = AggregateBucket::new("2025-05-06");
        assert_eq!(bucket.mean(), 0.0);
        assert_eq!(bucket.count, 0);
    }

    #[test]
    fn test_bucket_mean() {
        let bucket = AggregateBucket {
            key: "Exercise".to_string(),
            sum: 9.0,
            count: 2,
        };
        assert!((bucket.mean() - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_entry_date_key() {
        let entry = Entry {
            id: 1,
            timestamp: NaiveDate::from_ymd_opt(2025, 5, 6)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            value: EntryValue::Mood(3),
            tags: vec!["Sleep".to_string()],
            note: None,
        };
        assert_eq!(entry.date_key(), "2025-05-06");
        assert_eq!(entry.numeric(), Some(3.0));
    }

    #[test]
    fn test_journal_has_no_numeric_view() {
        let value = EntryValue::Journal {
            title: "Morning pages".to_string(),
            body: "Slept well.".to_string(),
            image_url: None,
        };
        assert_eq!(value.numeric(), None);
    }

    #[test]
    fn test_entry_serde_round_trip() {
        let entry = Entry {
            id: 7,
            timestamp: NaiveDate::from_ymd_opt(2025, 5, 7)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap(),
            value: EntryValue::Measure {
                metric: Metric::Water,
                value: 1.8,
            },
            tags: vec![],
            note: Some("after dinner".to_string()),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_mood_labels() {
        assert_eq!(mood_label(5), "Excellent");
        assert_eq!(mood_label(1), "Bad");
        assert_eq!(mood_label(3), "Okay");
    }
}
