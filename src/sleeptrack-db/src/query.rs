use chrono::NaiveDate;
use sleeptrack_types::SleepRecord;

/// Records for exactly the given calendar date, in stored order. Dates are
/// not unique, so this can return any number of records; none is not an
/// error.
pub fn find_by_date(records: &[SleepRecord], date: NaiveDate) -> Vec<SleepRecord> {
    records
        .iter()
        .filter(|record| record.date == date)
        .cloned()
        .collect()
}
