use chrono::NaiveTime;
use sleeptrack_types::SleepRecord;

use crate::normalize::{sleep_analysis_minutes, wake_minutes};

/// User-chosen "too late" clock times for the analysis view.
#[derive(Clone, Copy, Debug)]
pub struct LatenessThresholds {
    pub sleep: NaiveTime,
    pub wake: NaiveTime,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LatenessFlags {
    pub sleep_late: bool,
    pub wake_late: bool,
}

/// Per-record lateness against the thresholds. The sleep threshold itself
/// gets the analysis rollover rule, so a 00:30 threshold lands at 1470 and
/// compares correctly against post-midnight actual times. Equal to the
/// threshold is not late.
pub fn lateness_flags(records: &[SleepRecord], thresholds: LatenessThresholds) -> Vec<LatenessFlags> {
    let sleep_threshold = sleep_analysis_minutes(thresholds.sleep);
    let wake_threshold = wake_minutes(thresholds.wake);

    records
        .iter()
        .map(|record| LatenessFlags {
            sleep_late: sleep_analysis_minutes(record.actual_sleep) > sleep_threshold,
            wake_late: wake_minutes(record.actual_wake) > wake_threshold,
        })
        .collect()
}
