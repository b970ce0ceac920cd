use std::fmt::Display;

use sleeptrack_types::SleepRecord;

use crate::helpers::format_hm::FormatHM;
use crate::normalize::{DAY_MINUTES, sleep_analysis_minutes, wake_minutes};

/// Which actual/expected pair a delta is computed over. Sleep pairs are
/// normalized with the analysis rule, wake pairs stay literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaField {
    Sleep,
    Wake,
}

/// Arithmetic mean of already-rolled-over minute values, folded back into
/// the 0..1440 display range. Not a true angular mean: mixed samples on
/// both sides of a wrap boundary skew the result. Kept as-is because every
/// historical average was computed this way.
pub fn circular_mean_minutes(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    Some(mean.rem_euclid(DAY_MINUTES as f64))
}

/// Mean of `actual - expected` in minutes, split into hour and minute
/// parts. Sign convention is pinned: the mean is floored toward negative
/// infinity, the hour part uses floor division and the minute part is
/// always in `0..=59`, so a mean of -30 minutes comes out as `(-1, 30)`.
pub fn average_delta(records: &[SleepRecord], field: DeltaField) -> Option<(i64, i64)> {
    if records.is_empty() {
        return None;
    }

    let sum: i64 = records
        .iter()
        .map(|record| match field {
            DeltaField::Sleep => {
                sleep_analysis_minutes(record.actual_sleep)
                    - sleep_analysis_minutes(record.expected_sleep)
            }
            DeltaField::Wake => {
                wake_minutes(record.actual_wake) - wake_minutes(record.expected_wake)
            }
        })
        .sum();

    let mean = (sum as f64 / records.len() as f64).floor() as i64;
    Some((mean.div_euclid(60), mean.rem_euclid(60)))
}

/// The averages summary of the analysis view: circular means of the four
/// time columns plus the two average deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SleepAverages {
    pub expected_sleep: f64,
    pub actual_sleep: f64,
    pub expected_wake: f64,
    pub actual_wake: f64,
    pub sleep_delta: (i64, i64),
    pub wake_delta: (i64, i64),
}

impl SleepAverages {
    pub fn from_records(records: &[SleepRecord]) -> Option<Self> {
        let sleep = |f: fn(&SleepRecord) -> chrono::NaiveTime| {
            circular_mean_minutes(
                &records
                    .iter()
                    .map(|r| sleep_analysis_minutes(f(r)))
                    .collect::<Vec<_>>(),
            )
        };
        let wake = |f: fn(&SleepRecord) -> chrono::NaiveTime| {
            circular_mean_minutes(&records.iter().map(|r| wake_minutes(f(r))).collect::<Vec<_>>())
        };

        Some(Self {
            expected_sleep: sleep(|r| r.expected_sleep)?,
            actual_sleep: sleep(|r| r.actual_sleep)?,
            expected_wake: wake(|r| r.expected_wake)?,
            actual_wake: wake(|r| r.actual_wake)?,
            sleep_delta: average_delta(records, DeltaField::Sleep)?,
            wake_delta: average_delta(records, DeltaField::Wake)?,
        })
    }
}

impl Display for SleepAverages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Average Expected Sleep Time: {}\nAverage Sleep Time: {}\n",
            self.expected_sleep.format_hm(),
            self.actual_sleep.format_hm(),
        ))?;
        f.write_fmt(format_args!(
            "Average Expected Wake Time: {}\nAverage Wake Time: {}\n",
            self.expected_wake.format_hm(),
            self.actual_wake.format_hm(),
        ))?;
        f.write_fmt(format_args!(
            "Average Sleep Difference (Actual - Expected): {}h {}m\n",
            self.sleep_delta.0, self.sleep_delta.1,
        ))?;
        f.write_fmt(format_args!(
            "Average Wake Difference (Actual - Expected): {}h {}m",
            self.wake_delta.0, self.wake_delta.1,
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use sleeptrack_types::SleepTimes;

    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(times: SleepTimes) -> SleepRecord {
        SleepRecord::new(
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            times,
            String::new(),
            String::new(),
        )
    }

    fn sleep_pair(expected: NaiveTime, actual: NaiveTime) -> SleepRecord {
        record(SleepTimes {
            expected_sleep: expected,
            actual_sleep: actual,
            expected_wake: time(7, 0),
            actual_wake: time(7, 0),
        })
    }

    #[test]
    fn delta_crosses_midnight() {
        // 00:00 -> 1440, 23:30 -> 1410: half an hour late, not -23.5h
        let records = vec![sleep_pair(time(23, 30), time(0, 0))];
        assert_eq!(average_delta(&records, DeltaField::Sleep), Some((0, 30)));
    }

    #[test]
    fn negative_delta_floors_toward_negative_infinity() {
        let records = vec![sleep_pair(time(23, 30), time(23, 0))];
        assert_eq!(average_delta(&records, DeltaField::Sleep), Some((-1, 30)));

        let records = vec![sleep_pair(time(23, 30), time(22, 0))];
        assert_eq!(average_delta(&records, DeltaField::Sleep), Some((-2, 30)));
    }

    #[test]
    fn wake_delta_is_literal() {
        let records = vec![record(SleepTimes {
            expected_sleep: time(23, 0),
            actual_sleep: time(23, 0),
            expected_wake: time(7, 0),
            actual_wake: time(8, 15),
        })];
        assert_eq!(average_delta(&records, DeltaField::Wake), Some((1, 15)));
    }

    #[test]
    fn circular_mean_folds_past_midnight() {
        // 23:00 and 01:00 (rolled to 25:00) average to 24:00 -> 00:00
        assert_eq!(circular_mean_minutes(&[1380, 1500]), Some(0.0));
        assert_eq!(circular_mean_minutes(&[420, 480]), Some(450.0));
        assert_eq!(circular_mean_minutes(&[]), None);
    }

    #[test]
    fn averages_summary() {
        let records = vec![
            sleep_pair(time(23, 0), time(23, 30)),
            sleep_pair(time(23, 0), time(0, 30)),
        ];

        let averages = SleepAverages::from_records(&records).unwrap();
        assert_eq!(averages.expected_sleep, 1380.0);
        // (1410 + 1470) / 2 = 1440 -> folds to 00:00
        assert_eq!(averages.actual_sleep, 0.0);
        assert_eq!(averages.sleep_delta, (1, 0));
        assert_eq!(averages.wake_delta, (0, 0));

        let rendered = averages.to_string();
        assert!(rendered.contains("Average Sleep Time: 00:00"));
        assert!(rendered.contains("Average Sleep Difference (Actual - Expected): 1h 0m"));
    }

    #[test]
    fn empty_records_have_no_averages() {
        assert!(SleepAverages::from_records(&[]).is_none());
    }
}
