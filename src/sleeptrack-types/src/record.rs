use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One sleep entry. Multiple records may share a `date`; insertion order in
/// the store is what tells them apart visually, the `id` is what tells them
/// apart for edits and deletes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub expected_sleep: NaiveTime,
    #[serde(with = "hhmm")]
    pub actual_sleep: NaiveTime,
    #[serde(with = "hhmm")]
    pub expected_wake: NaiveTime,
    #[serde(with = "hhmm")]
    pub actual_wake: NaiveTime,
    #[serde(default)]
    pub reason_sleep: String,
    #[serde(default)]
    pub reason_wake: String,
}

/// The four clock times of a record, bundled for create/edit calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SleepTimes {
    pub expected_sleep: NaiveTime,
    pub actual_sleep: NaiveTime,
    pub expected_wake: NaiveTime,
    pub actual_wake: NaiveTime,
}

impl SleepRecord {
    pub fn new(
        date: NaiveDate,
        times: SleepTimes,
        reason_sleep: String,
        reason_wake: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            expected_sleep: times.expected_sleep,
            actual_sleep: times.actual_sleep,
            expected_wake: times.expected_wake,
            actual_wake: times.actual_wake,
            reason_sleep,
            reason_wake,
        }
    }

    /// Edit semantics: only the four time fields change. The reasons are
    /// NOT recomputed even when the new times would no longer require one.
    pub fn with_times(&self, times: SleepTimes) -> Self {
        Self {
            expected_sleep: times.expected_sleep,
            actual_sleep: times.actual_sleep,
            expected_wake: times.expected_wake,
            actual_wake: times.actual_wake,
            ..self.clone()
        }
    }

    pub fn times(&self) -> SleepTimes {
        SleepTimes {
            expected_sleep: self.expected_sleep,
            actual_sleep: self.actual_sleep,
            expected_wake: self.expected_wake,
            actual_wake: self.actual_wake,
        }
    }
}

/// Strict `HH:MM` wire format. Minute granularity; `23:00:15` is rejected
/// on load rather than silently truncated.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(D::Error::custom)
    }
}
