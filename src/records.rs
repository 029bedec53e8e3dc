use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single saved mistake. Built only by the timer when a session is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    /// Equal to `start_time`.
    pub id: i64,
    pub category: String,
    /// Epoch milliseconds.
    pub start_time: i64,
    pub end_time: Option<i64>,
    /// Seconds.
    pub duration: Option<i64>,
    pub summary: String,
}

impl MistakeRecord {
    pub fn date_key(&self) -> String {
        date_key_of(self.start_time)
    }
}

/// Serialized form of the store used by the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RecordStoreSnapshot {
    pub days: BTreeMap<String, Vec<MistakeRecord>>,
}

/// Append-only map of date-key to the records started on that local day.
///
/// The store trusts its caller: records are assumed well formed and are
/// filed under the date-key derived from `start_time`.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    days: BTreeMap<String, Vec<MistakeRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: RecordStoreSnapshot) -> Self {
        let mut store = Self::new();
        // Re-file every record so a hand-edited snapshot cannot break the key invariant.
        for record in snapshot.days.into_values().flatten() {
            store.append(record);
        }
        store
    }

    pub fn snapshot(&self) -> RecordStoreSnapshot {
        RecordStoreSnapshot {
            days: self.days.clone(),
        }
    }

    pub fn append(&mut self, record: MistakeRecord) {
        self.days.entry(record.date_key()).or_default().push(record);
    }

    pub fn get_by_date(&self, date_key: &str) -> &[MistakeRecord] {
        self.days.get(date_key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn count_on(&self, date: NaiveDate) -> usize {
        self.get_by_date(&date_key(date)).len()
    }

    pub fn total_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn all_records_flat(&self) -> Vec<&MistakeRecord> {
        self.days.values().flatten().collect()
    }

    /// Date-keys with at least one record, ascending.
    pub fn date_keys(&self) -> impl Iterator<Item = &str> {
        self.days
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(key, _)| key.as_str())
    }

    /// Per-day record lists, keyed by date-key.
    pub fn days(&self) -> impl Iterator<Item = (&str, &[MistakeRecord])> {
        self.days
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Local calendar date of an epoch-millisecond timestamp.
pub fn local_date_of(timestamp_ms: i64) -> NaiveDate {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

pub fn date_key_of(timestamp_ms: i64) -> String {
    date_key(local_date_of(timestamp_ms))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Epoch ms for a local wall-clock time.
    pub(crate) fn local_ms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, m, d, h, min, s)
            .single()
            .expect("unambiguous local time")
            .timestamp_millis()
    }

    pub(crate) fn record_at(start_time: i64, category: &str, duration: i64) -> MistakeRecord {
        MistakeRecord {
            id: start_time,
            category: category.to_string(),
            start_time,
            end_time: Some(start_time + duration * 1000),
            duration: Some(duration),
            summary: "noted".to_string(),
        }
    }

    #[test]
    fn append_files_records_under_start_date_in_call_order() {
        let mut store = RecordStore::new();
        let first = record_at(local_ms(2024, 3, 9, 8, 0, 0), "a", 10);
        let other_day = record_at(local_ms(2024, 3, 10, 9, 0, 0), "b", 20);
        let second = record_at(local_ms(2024, 3, 9, 23, 59, 0), "c", 30);

        store.append(first.clone());
        store.append(other_day.clone());
        store.append(second.clone());

        assert_eq!(store.total_count(), 3);
        assert_eq!(store.get_by_date("2024-03-09"), &[first, second]);
        assert_eq!(store.get_by_date("2024-03-10"), &[other_day]);
        assert_eq!(store.all_records_flat().len(), 3);
    }

    #[test]
    fn unknown_date_key_is_empty() {
        let store = RecordStore::new();
        assert!(store.get_by_date("1999-12-31").is_empty());
        assert!(store.get_by_date("not-a-date").is_empty());
        assert_eq!(store.total_count(), 0);
    }

    #[test]
    fn date_keys_are_sorted_ascending() {
        let mut store = RecordStore::new();
        store.append(record_at(local_ms(2024, 2, 1, 12, 0, 0), "a", 1));
        store.append(record_at(local_ms(2023, 12, 31, 12, 0, 0), "a", 1));
        store.append(record_at(local_ms(2024, 1, 15, 12, 0, 0), "a", 1));

        let keys: Vec<_> = store.date_keys().collect();
        assert_eq!(keys, vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
    }

    #[test]
    fn snapshot_restore_refiles_misplaced_records() {
        let record = record_at(local_ms(2024, 5, 2, 10, 0, 0), "a", 5);
        let mut snapshot = RecordStoreSnapshot::default();
        snapshot
            .days
            .insert("2000-01-01".to_string(), vec![record.clone()]);

        let store = RecordStore::from_snapshot(snapshot);
        assert!(store.get_by_date("2000-01-01").is_empty());
        assert_eq!(store.get_by_date("2024-05-02"), &[record]);
    }

    #[test]
    fn parse_date_key_accepts_canonical_form() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(parse_date_key("2024-01-05"), Some(date));
        assert_eq!(date_key(date), "2024-01-05");
        assert_eq!(parse_date_key("05/01/2024"), None);
    }
}
