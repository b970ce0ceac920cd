pub(crate) mod normalize;
pub use normalize::{
    requires_sleep_reason, requires_wake_reason, sleep_analysis_minutes, sleep_entry_minutes,
    wake_minutes,
};

pub(crate) mod lateness;
pub use lateness::{LatenessFlags, LatenessThresholds, lateness_flags};

pub(crate) mod averages;
pub use averages::{DeltaField, SleepAverages, average_delta, circular_mean_minutes};

pub mod helpers;
