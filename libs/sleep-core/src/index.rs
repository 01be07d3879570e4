//! Per-date ordered index of entries.
//!
//! Each date owns a bucket kept sorted by clock time, with insertion order
//! preserved among equal times. Looking up a date's entries or the next
//! populated date never scans other buckets.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::NaiveDate;

use crate::error::FormatError;
use crate::time::time_to_minutes;
use crate::types::TimeEntry;

#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    buckets: BTreeMap<NaiveDate, Vec<(u32, TimeEntry)>>,
}

impl EntryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from entries in any order.
    pub fn from_entries<I>(entries: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = TimeEntry>,
    {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry)?;
        }
        Ok(index)
    }

    /// Insert an entry into its date bucket.
    pub fn insert(&mut self, entry: TimeEntry) -> Result<(), FormatError> {
        let minutes = time_to_minutes(&entry.time)?;
        let bucket = self.buckets.entry(entry.date).or_default();
        // Insert after every entry with time <= minutes.
        let pos = bucket.partition_point(|(m, _)| *m <= minutes);
        bucket.insert(pos, (minutes, entry));
        Ok(())
    }

    /// Remove an entry by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: i64) -> bool {
        let found = self.buckets.iter_mut().find_map(|(date, bucket)| {
            bucket
                .iter()
                .position(|(_, e)| e.id == id)
                .map(|pos| (*date, pos))
        });

        match found {
            Some((date, pos)) => {
                if let Some(bucket) = self.buckets.get_mut(&date) {
                    bucket.remove(pos);
                    if bucket.is_empty() {
                        self.buckets.remove(&date);
                    }
                }
                true
            }
            None => false,
        }
    }

    /// Remove every entry for `date`, returning how many were removed.
    pub fn clear_date(&mut self, date: NaiveDate) -> usize {
        self.buckets.remove(&date).map(|b| b.len()).unwrap_or(0)
    }

    /// Remove everything, returning how many entries were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.len();
        self.buckets.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Entries for `date`, ascending by time.
    pub fn entries_for(&self, date: NaiveDate) -> Vec<&TimeEntry> {
        self.buckets
            .get(&date)
            .map(|b| b.iter().map(|(_, e)| e).collect())
            .unwrap_or_default()
    }

    /// Owned copy of the entries for `date`.
    pub fn day(&self, date: NaiveDate) -> Vec<TimeEntry> {
        self.entries_for(date).into_iter().cloned().collect()
    }

    /// Populated dates, ascending.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    /// The first populated date strictly after `date`.
    pub fn next_populated_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.buckets
            .range((Bound::Excluded(date), Bound::Unbounded))
            .next()
            .map(|(d, _)| *d)
    }

    /// Populated dates in `from..=to`, ascending, with their entries.
    /// Empty when `from > to`.
    pub fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (NaiveDate, Vec<&TimeEntry>)> + '_ {
        let bounds = (from <= to).then_some(from..=to);
        bounds
            .into_iter()
            .flat_map(move |bounds| self.buckets.range(bounds))
            .map(|(d, b)| (*d, b.iter().map(|(_, e)| e).collect()))
    }

    /// All entries: descending by date, ascending by time within a date.
    pub fn all_desc(&self) -> Vec<TimeEntry> {
        self.buckets
            .values()
            .rev()
            .flat_map(|b| b.iter().map(|(_, e)| e.clone()))
            .collect()
    }
}
