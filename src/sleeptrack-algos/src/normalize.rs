use chrono::{NaiveTime, Timelike as _};

pub const DAY_MINUTES: i64 = 24 * 60;

const ENTRY_CUTOFF: i64 = 12 * 60;
const ANALYSIS_CUTOFF: i64 = 5 * 60;

fn clock_minutes(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Sleep time on the sleep-day scale, entry rule: anything before noon is
/// taken as "after midnight of the same night" and shifted past 24h, so
/// 23:00 -> 1380 and 00:30 -> 1470.
///
/// The analysis side uses a 05:00 cutoff instead
/// ([`sleep_analysis_minutes`]). The two rules are intentionally kept
/// separate; recorded reasons depend on this one and charts on the other,
/// so merging them would rewrite history.
pub fn sleep_entry_minutes(time: NaiveTime) -> i64 {
    let mins = clock_minutes(time);
    if mins < ENTRY_CUTOFF {
        mins + DAY_MINUTES
    } else {
        mins
    }
}

/// Sleep time on the sleep-day scale, analysis rule: only 00:00-04:59 rolls
/// past 24h. 05:00-11:59 stays literal, unlike the entry rule.
pub fn sleep_analysis_minutes(time: NaiveTime) -> i64 {
    let mins = clock_minutes(time);
    if mins < ANALYSIS_CUTOFF {
        mins + DAY_MINUTES
    } else {
        mins
    }
}

/// Wake times never roll over.
pub fn wake_minutes(time: NaiveTime) -> i64 {
    clock_minutes(time)
}

/// Whether a reason must be recorded for going to sleep later than planned.
/// Strictly later under the entry rule; equal is never late.
pub fn requires_sleep_reason(expected: NaiveTime, actual: NaiveTime) -> bool {
    sleep_entry_minutes(actual) > sleep_entry_minutes(expected)
}

/// Whether a reason must be recorded for waking later than planned.
pub fn requires_wake_reason(expected: NaiveTime, actual: NaiveTime) -> bool {
    wake_minutes(actual) > wake_minutes(expected)
}
