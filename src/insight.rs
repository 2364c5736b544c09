//! Insight generation
//!
//! Derives a small ordered list of natural-language observations from
//! aggregate statistics. Rule evaluation order is fixed: overall average,
//! most frequent mood, best day, worst day, best correlated activity, best
//! time of day. A rule whose preconditions do not hold is skipped, never
//! replaced with placeholder text.
//!
//! Displayed statistics are rounded to one decimal place; counts stay
//! integers.

use crate::aggregate;
use crate::types::{
    mood_label, AggregateBucket, Entry, EntryValue, Insight, InsightKind, MOOD_MAX, MOOD_MIN,
};

/// Generates insights for a mood-entry snapshot.
///
/// `activity_universe` is the set of activity tags considered for the
/// correlation rule. An empty snapshot yields an empty list.
pub fn generate(entries: &[&Entry], activity_universe: &[&str]) -> Vec<Insight> {
    let moods: Vec<&Entry> = entries
        .iter()
        .copied()
        .filter(|e| matches!(e.value, EntryValue::Mood(_)))
        .collect();
    if moods.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();

    // Rule 1: overall average.
    let levels: Vec<f64> = moods.iter().filter_map(|e| e.numeric()).collect();
    let average = aggregate::mean(&levels);
    insights.push(Insight {
        kind: InsightKind::Average,
        text: format!("Your average mood is {average:.1} out of {MOOD_MAX}"),
    });

    // Rule 2: most frequent mood. Ties resolve to the lower level.
    if let Some((level, count)) = most_common_level(&moods) {
        insights.push(Insight {
            kind: InsightKind::MostCommon,
            text: format!(
                "Your most common mood is \"{}\" ({count} times)",
                mood_label(level)
            ),
        });
    }

    // Rules 3 and 4: best and worst day. Ties resolve to the earlier date.
    let daily = aggregate::group_by_date(&moods);
    let mut best: Option<(&str, f64)> = None;
    let mut worst: Option<(&str, f64)> = None;
    for bucket in daily.values() {
        let mean = bucket.mean();
        if best.map_or(true, |(_, m)| mean > m) {
            best = Some((&bucket.key, mean));
        }
        if worst.map_or(true, |(_, m)| mean < m) {
            worst = Some((&bucket.key, mean));
        }
    }
    if let Some((date, mean)) = best {
        insights.push(Insight {
            kind: InsightKind::BestDay,
            text: format!("Your best day was {date} with average mood {mean:.1}"),
        });
    }
    if let Some((date, mean)) = worst {
        insights.push(Insight {
            kind: InsightKind::WorstDay,
            text: format!("Your most challenging day was {date} with average mood {mean:.1}"),
        });
    }

    // Rule 5: best correlated activity. Needs at least one matched tag.
    let correlations = aggregate::correlate_by_tag(&moods, activity_universe);
    if let Some(top) = correlations.first() {
        insights.push(Insight {
            kind: InsightKind::BestTag,
            text: format!(
                "\"{}\" is associated with your highest mood (avg: {:.1})",
                top.tag, top.mean
            ),
        });
    }

    // Rule 6: best time of day. Needs a non-empty bucket; ties resolve to
    // the earlier slot.
    let slots = aggregate::group_by_time_of_day(&moods);
    let mut best_slot: Option<&AggregateBucket> = None;
    for bucket in slots.iter().filter(|b| b.count > 0) {
        if best_slot.map_or(true, |b| bucket.mean() > b.mean()) {
            best_slot = Some(bucket);
        }
    }
    if let Some(bucket) = best_slot {
        insights.push(Insight {
            kind: InsightKind::BestTimeOfDay,
            text: format!(
                "You tend to feel best during {} hours",
                bucket.key.to_lowercase()
            ),
        });
    }

    insights
}

/// Most frequent mood level and its count; `None` when no mood entries.
fn most_common_level(moods: &[&Entry]) -> Option<(u8, usize)> {
    let mut counts = [0usize; (MOOD_MAX - MOOD_MIN + 1) as usize];
    for entry in moods {
        if let EntryValue::Mood(level) = entry.value {
            if (MOOD_MIN..=MOOD_MAX).contains(&level) {
                counts[(level - MOOD_MIN) as usize] += 1;
            }
        }
    }
    let mut best: Option<(u8, usize)> = None;
    for (index, count) in counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        // Strict comparison keeps the first maximum, so ties go to the
        // lower level.
        if best.map_or(true, |(_, c)| *count > c) {
            best = Some((index as u8 + MOOD_MIN, *count));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn mood(id: u64, level: u8, day: u32, hour: u32, tags: &[&str]) -> Entry {
        Entry {
            id,
            timestamp: ts(day, hour),
            value: EntryValue::Mood(level),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            note: None,
        }
    }

    #[test]
    fn test_empty_snapshot_yields_no_insights() {
        assert!(generate(&[], &["Exercise"]).is_empty());
    }

    #[test]
    fn test_rule_order_and_texts() {
        let entries = vec![
            mood(1, 3, 6, 8, &["Sleep"]),
            mood(2, 5, 6, 20, &["Exercise"]),
            mood(3, 1, 7, 8, &["Sleep"]),
            mood(4, 3, 7, 14, &[]),
        ];
        let refs: Vec<&Entry> = entries.iter().collect();
        let insights = generate(&refs, &["Exercise", "Sleep"]);

        let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::Average,
                InsightKind::MostCommon,
                InsightKind::BestDay,
                InsightKind::WorstDay,
                InsightKind::BestTag,
                InsightKind::BestTimeOfDay,
            ]
        );

        assert_eq!(insights[0].text, "Your average mood is 3.0 out of 5");
        assert_eq!(insights[1].text, "Your most common mood is \"Okay\" (2 times)");
        assert_eq!(
            insights[2].text,
            "Your best day was 2025-05-06 with average mood 4.0"
        );
        assert_eq!(
            insights[3].text,
            "Your most challenging day was 2025-05-07 with average mood 2.0"
        );
        assert_eq!(
            insights[4].text,
            "\"Exercise\" is associated with your highest mood (avg: 5.0)"
        );
        assert_eq!(
            insights[5].text,
            "You tend to feel best during evening hours"
        );
    }

    #[test]
    fn test_tag_rule_skipped_without_correlations() {
        let entries = vec![mood(1, 4, 6, 8, &[])];
        let refs: Vec<&Entry> = entries.iter().collect();
        let insights = generate(&refs, &["Exercise"]);
        assert!(!insights.iter().any(|i| i.kind == InsightKind::BestTag));
        // The remaining rules still fire.
        assert!(insights.iter().any(|i| i.kind == InsightKind::Average));
        assert!(insights.iter().any(|i| i.kind == InsightKind::BestTimeOfDay));
    }

    #[test]
    fn test_statistics_round_to_one_decimal() {
        let entries = vec![
            mood(1, 3, 6, 8, &[]),
            mood(2, 4, 6, 9, &[]),
            mood(3, 4, 6, 10, &[]),
        ];
        let refs: Vec<&Entry> = entries.iter().collect();
        let insights = generate(&refs, &[]);
        // 11 / 3 = 3.666... renders as 3.7.
        assert_eq!(insights[0].text, "Your average mood is 3.7 out of 5");
    }

    #[test]
    fn test_most_common_tie_prefers_lower_level() {
        let entries = vec![
            mood(1, 2, 6, 8, &[]),
            mood(2, 4, 6, 9, &[]),
        ];
        let refs: Vec<&Entry> = entries.iter().collect();
        let insights = generate(&refs, &[]);
        let most_common = insights
            .iter()
            .find(|i| i.kind == InsightKind::MostCommon)
            .unwrap();
        assert_eq!(most_common.text, "Your most common mood is \"Not great\" (1 times)");
    }

    #[test]
    fn test_time_of_day_tie_prefers_earlier_slot() {
        // Morning and evening both average 4.0.
        let entries = vec![mood(1, 4, 6, 8, &[]), mood(2, 4, 6, 20, &[])];
        let refs: Vec<&Entry> = entries.iter().collect();
        let insights = generate(&refs, &[]);
        let best = insights
            .iter()
            .find(|i| i.kind == InsightKind::BestTimeOfDay)
            .unwrap();
        assert_eq!(best.text, "You tend to feel best during morning hours");
    }

    #[test]
    fn test_journal_entries_are_ignored() {
        let entries = vec![Entry {
            id: 1,
            timestamp: ts(6, 9),
            value: EntryValue::Journal {
                title: "t".to_string(),
                body: "b".to_string(),
                image_url: None,
            },
            tags: vec![],
            note: None,
        }];
        let refs: Vec<&Entry> = entries.iter().collect();
        assert!(generate(&refs, &[]).is_empty());
    }
}
