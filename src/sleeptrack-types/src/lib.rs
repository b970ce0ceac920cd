mod record;
pub use record::{SleepRecord, SleepTimes, hhmm};
