use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use sleeptrack_types::{SleepRecord, SleepTimes};
use thiserror::Error;
use uuid::Uuid;

use crate::query;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the one JSON file holding the full record list. Every mutating
/// operation is a single load-mutate-persist unit and `save` rewrites the
/// whole collection through a temp file, so a crash mid-write leaves the
/// previous file intact. Reads never fail: anything unreadable degrades to
/// an empty list (or a skipped element) with a warning in the log.
#[derive(Clone, Debug)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All persisted records in insertion order. A missing or unparseable
    /// file yields an empty list; a malformed element is skipped and the
    /// rest are kept. No error ever reaches the caller from here.
    pub fn load(&self) -> Vec<SleepRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                if error.kind() != io::ErrorKind::NotFound {
                    warn!("could not read {}: {}", self.path.display(), error);
                }
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(error) => {
                warn!(
                    "{} does not hold a record list, starting empty: {}",
                    self.path.display(),
                    error
                );
                return Vec::new();
            }
        };

        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SleepRecord>(value) {
                Ok(record) => Some(record),
                Err(error) => {
                    warn!(
                        "skipping malformed record in {}: {}",
                        self.path.display(),
                        error
                    );
                    None
                }
            })
            .collect()
    }

    /// Replaces the whole persisted collection. Written to a sibling temp
    /// file first and renamed into place.
    pub fn save(&self, records: &[SleepRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;

        let tmp = self.path.with_extension("json.tmp");
        let write = |path: &Path, source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };

        fs::write(&tmp, json).map_err(|e| write(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| write(&self.path, e))?;
        Ok(())
    }

    pub fn append(&self, record: SleepRecord) -> Result<(), StoreError> {
        let mut records = self.load();
        records.push(record);
        self.save(&records)
    }

    /// Overwrites the four time fields of the record with the given id.
    /// Date and reasons stay as they are. Returns false when no record has
    /// that id.
    pub fn update(&self, id: Uuid, times: SleepTimes) -> Result<bool, StoreError> {
        let mut records = self.load();
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        records[index] = records[index].with_times(times);
        self.save(&records)?;
        Ok(true)
    }

    /// Removes exactly one record: the one with a matching id, or, for a
    /// record whose id is unknown to the store (hand-built, or loaded from
    /// a pre-id file where ids are regenerated), the first record whose
    /// visible fields all match. Among exact duplicates the fallback
    /// cannot tell instances apart and takes the first.
    pub fn remove(&self, record: &SleepRecord) -> Result<bool, StoreError> {
        let mut records = self.load();
        let index = records
            .iter()
            .position(|r| r.id == record.id)
            .or_else(|| records.iter().position(|r| same_fields(r, record)));

        let Some(index) = index else {
            return Ok(false);
        };

        records.remove(index);
        self.save(&records)?;
        Ok(true)
    }

    pub fn find_by_date(&self, date: NaiveDate) -> Vec<SleepRecord> {
        query::find_by_date(&self.load(), date)
    }
}

/// Equality over everything the user can see, ignoring the generated id.
fn same_fields(a: &SleepRecord, b: &SleepRecord) -> bool {
    a.date == b.date
        && a.times() == b.times()
        && a.reason_sleep == b.reason_sleep
        && a.reason_wake == b.reason_wake
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use tempfile::TempDir;

    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn record(d: u32) -> SleepRecord {
        SleepRecord::new(
            date(d),
            SleepTimes {
                expected_sleep: time(23, 0),
                actual_sleep: time(23, 30),
                expected_wake: time(7, 0),
                actual_wake: time(7, 0),
            },
            "late call".to_owned(),
            String::new(),
        )
    }

    fn store(dir: &TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("sleep.json"))
    }

    #[test]
    fn save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let records = vec![record(1), record(2), record(3)];
        store.save(&records).unwrap();

        assert_eq!(store.load(), records);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "not json at all {{").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn malformed_element_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let good = record(1);
        let json = format!(
            "[{},{}]",
            serde_json::to_string(&good).unwrap(),
            r#"{"date":"2025-03-02","expected_sleep":"25:99","actual_sleep":"23:00","expected_wake":"07:00","actual_wake":"07:00"}"#,
        );
        fs::write(store.path(), json).unwrap();

        assert_eq!(store.load(), vec![good]);
    }

    #[test]
    fn append_persists() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(record(1)).unwrap();
        store.append(record(2)).unwrap();

        let records = store.load();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, date(1));
        assert_eq!(records[1].date, date(2));
    }

    #[test]
    fn update_touches_only_times() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let original = record(1);
        store.append(original.clone()).unwrap();

        let times = SleepTimes {
            expected_sleep: time(22, 0),
            actual_sleep: time(22, 0),
            expected_wake: time(6, 0),
            actual_wake: time(6, 0),
        };
        assert!(store.update(original.id, times).unwrap());

        let updated = &store.load()[0];
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.reason_sleep, "late call");
        assert_eq!(updated.times(), times);

        assert!(!store.update(Uuid::new_v4(), times).unwrap());
    }

    #[test]
    fn remove_takes_exactly_one_duplicate() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        // two records with identical fields apart from their generated ids
        let first = record(1);
        let twin = SleepRecord {
            id: Uuid::new_v4(),
            ..first.clone()
        };
        let other = record(2);
        store.save(&[first.clone(), twin.clone(), other.clone()]).unwrap();

        assert!(store.remove(&twin).unwrap());
        assert_eq!(store.load(), vec![first, other]);
    }

    #[test]
    fn remove_falls_back_to_field_equality() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let stored = record(1);
        store.save(&[stored.clone()]).unwrap();

        // same visible fields, unknown id: a record held across a reload
        // of a pre-id file gets a regenerated id, so only the fields match
        let foreign = SleepRecord {
            id: Uuid::new_v4(),
            ..stored.clone()
        };
        assert!(store.remove(&foreign).unwrap());
        assert!(store.load().is_empty());
    }

    #[test]
    fn remove_missing_record_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.append(record(1)).unwrap();

        assert!(!store.remove(&record(2)).unwrap());
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn find_by_date_filters_exactly() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.append(record(1)).unwrap();
        store.append(record(2)).unwrap();

        assert_eq!(store.find_by_date(date(1)).len(), 1);
        assert_eq!(store.find_by_date(date(2)).len(), 1);
        assert!(store.find_by_date(date(3)).is_empty());
    }
}
