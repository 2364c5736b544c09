//! Entry store
//!
//! Holds the ordered set of entries for one domain (moods, metric samples,
//! or journal notes) and exposes CRUD operations. Every mutation validates
//! the whole entry first and commits atomically; a rejected mutation leaves
//! the store untouched.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{CoreError, ValidationErrors};
use crate::types::{Entry, EntryId, EntryValue, MOOD_MAX, MOOD_MIN};

/// Outcome of the host's confirmation dialog for a destructive action.
///
/// The core never prompts; the UI resolves intent and passes the result in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Input for [`EntryStore::add`]: an entry without identity.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// Wall-clock time of the entry; `None` stamps the current local time.
    pub timestamp: Option<NaiveDateTime>,
    pub value: EntryValue,
    pub tags: Vec<String>,
    pub note: Option<String>,
}

impl EntryDraft {
    pub fn new(value: EntryValue) -> Self {
        Self {
            timestamp: None,
            value,
            tags: Vec::new(),
            note: None,
        }
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial update for [`EntryStore::update`]; `None` fields are left as-is.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub timestamp: Option<NaiveDateTime>,
    pub value: Option<EntryValue>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the note, `Some(Some(_))` replaces it.
    pub note: Option<Option<String>>,
}

/// Optional predicate for [`EntryStore::list`].
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring over journal title/body, note, and tags
    pub text: Option<String>,
    /// Exact tag match
    pub tag: Option<String>,
}

impl EntryFilter {
    pub fn date_range(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn text(query: impl Into<String>) -> Self {
        Self {
            text: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        let date = entry.timestamp.date();
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !entry.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(query) = &self.text {
            let needle = query.to_lowercase();
            if !entry_text_matches(entry, &needle) {
                return false;
            }
        }
        true
    }
}

fn entry_text_matches(entry: &Entry, needle: &str) -> bool {
    if let EntryValue::Journal { title, body, .. } = &entry.value {
        if title.to_lowercase().contains(needle) || body.to_lowercase().contains(needle) {
            return true;
        }
    }
    if let Some(note) = &entry.note {
        if note.to_lowercase().contains(needle) {
            return true;
        }
    }
    entry.tags.iter().any(|t| t.to_lowercase().contains(needle))
}

/// Ordered collection of entries with store-assigned ids.
#[derive(Debug, Clone, Default)]
pub struct EntryStore {
    entries: Vec<Entry>,
    next_id: EntryId,
    revision: u64,
}

impl EntryStore {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Rebuilds a store from previously persisted entries.
    ///
    /// The id counter is re-derived from the highest loaded id so later
    /// additions cannot collide with restored entries.
    pub fn hydrate(entries: Vec<Entry>) -> Self {
        let next_id = entries.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        Self {
            entries,
            next_id,
            revision: 0,
        }
    }

    /// Validates an entry against its domain constraints.
    ///
    /// Used both for mutations and for screening persisted snapshots.
    pub fn validate(entry: &Entry) -> Result<(), CoreError> {
        let mut errors = ValidationErrors::default();
        match &entry.value {
            EntryValue::Mood(level) => {
                if !(MOOD_MIN..=MOOD_MAX).contains(level) {
                    errors.push(
                        "mood",
                        format!("must be between {MOOD_MIN} and {MOOD_MAX}, got {level}"),
                    );
                }
                if entry.tags.iter().any(|t| t.trim().is_empty()) {
                    errors.push("tags", "activity labels must not be blank");
                }
            }
            EntryValue::Measure { value, .. } => {
                if !value.is_finite() {
                    errors.push("value", "must be a finite number");
                } else if *value < 0.0 {
                    errors.push("value", format!("must be non-negative, got {value}"));
                }
            }
            EntryValue::Journal {
                title,
                body,
                image_url,
            } => {
                if title.trim().is_empty() {
                    errors.push("title", "must not be empty");
                }
                if body.trim().is_empty() {
                    errors.push("content", "must not be empty");
                }
                if let Some(url) = image_url {
                    if url.trim().is_empty() {
                        errors.push("image_url", "must not be blank when present");
                    }
                }
            }
        }
        errors.into_result()
    }

    /// Validates and appends a new entry, assigning the next id.
    ///
    /// On validation failure nothing is stored and every offending field is
    /// reported.
    pub fn add(&mut self, draft: EntryDraft) -> Result<&Entry, CoreError> {
        let entry = Entry {
            id: self.next_id,
            timestamp: draft
                .timestamp
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
            value: draft.value,
            tags: draft.tags,
            note: draft.note,
        };
        Self::validate(&entry)?;

        self.next_id += 1;
        self.revision += 1;
        self.entries.push(entry);
        Ok(self.entries.last().expect("entry was just pushed"))
    }

    /// Merges a patch into the entry with the given id and re-validates.
    ///
    /// The merge is staged on a copy; a failed validation leaves the stored
    /// entry exactly as it was (no partial mutation).
    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> Result<&Entry, CoreError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::NotFound(id))?;

        let mut merged = self.entries[index].clone();
        if let Some(timestamp) = patch.timestamp {
            merged.timestamp = timestamp;
        }
        if let Some(value) = patch.value {
            merged.value = value;
        }
        if let Some(tags) = patch.tags {
            merged.tags = tags;
        }
        if let Some(note) = patch.note {
            merged.note = note;
        }
        Self::validate(&merged)?;

        self.entries[index] = merged;
        self.revision += 1;
        Ok(&self.entries[index])
    }

    /// Removes the entry with the given id.
    ///
    /// The removal is irreversible, so it only proceeds when the host
    /// confirms intent; a declined confirmation is a non-destructive error.
    pub fn remove(&mut self, id: EntryId, confirmation: Confirmation) -> Result<Entry, CoreError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(CoreError::NotFound(id))?;
        if confirmation == Confirmation::Declined {
            return Err(CoreError::NotConfirmed);
        }
        self.revision += 1;
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Lazy, restartable sequence of entries in insertion order, optionally
    /// narrowed by a filter. Each call yields a fresh iterator; the filter
    /// is cloned into it, so the yielded entries borrow from the store only.
    pub fn list<'a>(
        &'a self,
        filter: Option<&EntryFilter>,
    ) -> impl Iterator<Item = &'a Entry> + 'a {
        let filter = filter.cloned();
        self.entries
            .iter()
            .filter(move |entry| filter.as_ref().map_or(true, |f| f.matches(entry)))
    }

    /// Filtered entries sorted by timestamp (stable, so same-time entries
    /// keep insertion order).
    pub fn list_by_timestamp(&self, filter: Option<&EntryFilter>) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.list(filter).collect();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    /// Full snapshot in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter bumped by every successful mutation; persistence and cached
    /// aggregates key off it.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn mood_draft(level: u8, day: u32, hour: u32, tags: &[&str]) -> EntryDraft {
        EntryDraft::new(EntryValue::Mood(level))
            .at(ts(day, hour))
            .with_tags(tags.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_add_assigns_fresh_ids_and_lists_entry() {
        let mut store = EntryStore::new();
        let id1 = store.add(mood_draft(3, 6, 8, &["Sleep"])).unwrap().id;
        let id2 = store.add(mood_draft(5, 6, 20, &["Social"])).unwrap().id;

        assert_ne!(id1, id2);
        let listed: Vec<_> = store.list(None).collect();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, id1);
        assert_eq!(listed[0].value, EntryValue::Mood(3));
        assert_eq!(listed[0].tags, vec!["Sleep".to_string()]);
    }

    #[test]
    fn test_add_rejects_out_of_range_mood_without_mutating() {
        let mut store = EntryStore::new();
        let err = store.add(mood_draft(6, 6, 8, &[])).unwrap_err();
        assert!(err.validation_issues().is_some());
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_add_rejects_negative_measure() {
        let mut store = EntryStore::new();
        let draft = EntryDraft::new(EntryValue::Measure {
            metric: Metric::Steps,
            value: -100.0,
        });
        let err = store.add(draft).unwrap_err();
        let issues = err.validation_issues().unwrap();
        assert_eq!(issues[0].field, "value");
    }

    #[test]
    fn test_add_collects_all_journal_field_issues() {
        let mut store = EntryStore::new();
        let draft = EntryDraft::new(EntryValue::Journal {
            title: "  ".to_string(),
            body: String::new(),
            image_url: None,
        });
        let err = store.add(draft).unwrap_err();
        let issues = err.validation_issues().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "title");
        assert_eq!(issues[1].field, "content");
    }

    #[test]
    fn test_update_merges_and_revalidates() {
        let mut store = EntryStore::new();
        let id = store.add(mood_draft(3, 6, 8, &["Work"])).unwrap().id;

        let updated = store
            .update(
                id,
                EntryPatch {
                    value: Some(EntryValue::Mood(4)),
                    note: Some(Some("better after coffee".to_string())),
                    ..EntryPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.value, EntryValue::Mood(4));
        assert_eq!(updated.tags, vec!["Work".to_string()]);
        assert_eq!(updated.note.as_deref(), Some("better after coffee"));
    }

    #[test]
    fn test_update_rejects_invalid_patch_without_partial_mutation() {
        let mut store = EntryStore::new();
        let id = store
            .add(
                mood_draft(3, 6, 8, &["Work"]).with_note("original"),
            )
            .unwrap()
            .id;

        let err = store
            .update(
                id,
                EntryPatch {
                    value: Some(EntryValue::Mood(0)),
                    note: Some(None),
                    ..EntryPatch::default()
                },
            )
            .unwrap_err();
        assert!(err.validation_issues().is_some());

        let entry = store.get(id).unwrap();
        assert_eq!(entry.value, EntryValue::Mood(3));
        assert_eq!(entry.note.as_deref(), Some("original"));
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let mut store = EntryStore::new();
        let err = store.update(42, EntryPatch::default()).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(42)));
    }

    #[test]
    fn test_remove_twice_returns_not_found() {
        let mut store = EntryStore::new();
        let id = store.add(mood_draft(3, 6, 8, &[])).unwrap().id;

        let removed = store.remove(id, Confirmation::Confirmed).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.list(None).all(|e| e.id != id));

        let err = store.remove(id, Confirmation::Confirmed).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_remove_declined_keeps_entry() {
        let mut store = EntryStore::new();
        let id = store.add(mood_draft(3, 6, 8, &[])).unwrap().id;
        let revision = store.revision();

        let err = store.remove(id, Confirmation::Declined).unwrap_err();
        assert!(matches!(err, CoreError::NotConfirmed));
        assert!(store.get(id).is_some());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_list_with_date_range_filter() {
        let mut store = EntryStore::new();
        store.add(mood_draft(3, 6, 8, &[])).unwrap();
        store.add(mood_draft(4, 7, 9, &[])).unwrap();
        store.add(mood_draft(2, 8, 10, &[])).unwrap();

        let filter = EntryFilter::date_range(
            NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 7).unwrap(),
        );
        let matched: Vec<_> = store.list(Some(&filter)).collect();
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_list_text_search_is_case_insensitive() {
        let mut store = EntryStore::new();
        store
            .add(EntryDraft::new(EntryValue::Journal {
                title: "Great Movie Night".to_string(),
                body: "Watched with friends.".to_string(),
                image_url: None,
            }))
            .unwrap();
        store
            .add(mood_draft(4, 6, 20, &["Exercise"]).with_note("evening run"))
            .unwrap();

        let by_title: Vec<_> = store.list(Some(&EntryFilter::text("movie"))).collect();
        assert_eq!(by_title.len(), 1);

        let by_note: Vec<_> = store.list(Some(&EntryFilter::text("RUN"))).collect();
        assert_eq!(by_note.len(), 1);

        let by_tag: Vec<_> = store.list(Some(&EntryFilter::text("exer"))).collect();
        assert_eq!(by_tag.len(), 1);
    }

    #[test]
    fn test_listed_entries_outlive_the_filter() {
        let mut store = EntryStore::new();
        store
            .add(mood_draft(4, 6, 20, &["Exercise"]).with_note("evening run"))
            .unwrap();
        store.add(mood_draft(2, 7, 8, &[])).unwrap();

        let matched: Vec<&Entry> = {
            let filter = EntryFilter::text("exercise");
            store.list(Some(&filter)).collect()
        };
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].value, EntryValue::Mood(4));

        let sorted = store.list_by_timestamp(Some(&EntryFilter::text("run")));
        assert_eq!(sorted.len(), 1);
    }

    #[test]
    fn test_list_by_timestamp_sorts_out_of_order_entries() {
        let mut store = EntryStore::new();
        store.add(mood_draft(2, 8, 8, &[])).unwrap();
        store.add(mood_draft(3, 6, 8, &[])).unwrap();
        store.add(mood_draft(4, 7, 8, &[])).unwrap();

        let sorted = store.list_by_timestamp(None);
        let days: Vec<u32> = sorted
            .iter()
            .map(|e| {
                use chrono::Datelike;
                e.timestamp.date().day()
            })
            .collect();
        assert_eq!(days, vec![6, 7, 8]);
    }

    #[test]
    fn test_hydrate_rederives_id_counter() {
        let mut seeded = EntryStore::new();
        seeded.add(mood_draft(3, 6, 8, &[])).unwrap();
        seeded.add(mood_draft(4, 6, 9, &[])).unwrap();

        let mut restored = EntryStore::hydrate(seeded.entries().to_vec());
        let next = restored.add(mood_draft(5, 6, 10, &[])).unwrap().id;
        assert_eq!(next, 3);
    }
}
