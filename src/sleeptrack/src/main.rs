#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::bail;
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use sleeptrack_algos::{
    LatenessThresholds, SleepAverages, helpers::format_hm::FormatHM as _, lateness_flags,
    requires_sleep_reason, requires_wake_reason,
};
use sleeptrack_db::RecordStore;
use sleeptrack_types::{SleepRecord, SleepTimes};
use uuid::Uuid;

#[derive(Parser)]
pub struct SleepTrackCli {
    /// Path of the record file, rewritten in full on every change
    #[arg(env, long, default_value = "sleep.json")]
    pub sleep_file: PathBuf,
    #[clap(subcommand)]
    pub subcommand: SleepTrackCommand,
}

#[derive(Subcommand)]
pub enum SleepTrackCommand {
    ///
    /// Add a sleep record for a date (today when omitted)
    ///
    Add {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_hhmm, default_value = "23:00")]
        expected_sleep: NaiveTime,
        #[arg(long, value_parser = parse_hhmm, default_value = "23:00")]
        actual_sleep: NaiveTime,
        #[arg(long, value_parser = parse_hhmm, default_value = "07:00")]
        expected_wake: NaiveTime,
        #[arg(long, value_parser = parse_hhmm, default_value = "07:00")]
        actual_wake: NaiveTime,
        /// Why sleep came later than expected (kept only when it did)
        #[arg(long)]
        reason_sleep: Option<String>,
        /// Why waking came later than expected (kept only when it did)
        #[arg(long)]
        reason_wake: Option<String>,
    },
    ///
    /// List records, all of them or one date's
    ///
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    ///
    /// Replace the four times of one record; date and reasons are kept
    ///
    Edit {
        id: Uuid,
        #[arg(long, value_parser = parse_hhmm)]
        expected_sleep: NaiveTime,
        #[arg(long, value_parser = parse_hhmm)]
        actual_sleep: NaiveTime,
        #[arg(long, value_parser = parse_hhmm)]
        expected_wake: NaiveTime,
        #[arg(long, value_parser = parse_hhmm)]
        actual_wake: NaiveTime,
    },
    ///
    /// Delete one record
    ///
    Delete { id: Uuid },
    ///
    /// Lateness flags and averages over all records
    ///
    Stats {
        #[arg(long, value_parser = parse_hhmm, default_value = "00:30")]
        sleep_threshold: NaiveTime,
        #[arg(long, value_parser = parse_hhmm, default_value = "08:30")]
        wake_threshold: NaiveTime,
    },
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M")
}

fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = SleepTrackCli::parse();
    let store = RecordStore::new(cli.sleep_file);

    match cli.subcommand {
        SleepTrackCommand::Add {
            date,
            expected_sleep,
            actual_sleep,
            expected_wake,
            actual_wake,
            reason_sleep,
            reason_wake,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let times = SleepTimes {
                expected_sleep,
                actual_sleep,
                expected_wake,
                actual_wake,
            };

            let reason_sleep = keep_reason(
                reason_sleep,
                requires_sleep_reason(expected_sleep, actual_sleep),
                "sleep",
            );
            let reason_wake = keep_reason(
                reason_wake,
                requires_wake_reason(expected_wake, actual_wake),
                "wake",
            );

            let record = SleepRecord::new(date, times, reason_sleep, reason_wake);
            let id = record.id;
            store.append(record)?;
            println!("Added record {} for {}", id, date);
            Ok(())
        }
        SleepTrackCommand::List { date } => {
            let records = match date {
                Some(date) => store.find_by_date(date),
                None => store.load(),
            };

            if records.is_empty() {
                println!("No records found.");
                return Ok(());
            }

            for record in &records {
                print_record(record);
            }
            Ok(())
        }
        SleepTrackCommand::Edit {
            id,
            expected_sleep,
            actual_sleep,
            expected_wake,
            actual_wake,
        } => {
            let times = SleepTimes {
                expected_sleep,
                actual_sleep,
                expected_wake,
                actual_wake,
            };

            if !store.update(id, times)? {
                bail!("No record with id {}", id);
            }

            println!("Record {} updated", id);
            Ok(())
        }
        SleepTrackCommand::Delete { id } => {
            let records = store.load();
            let Some(record) = records.iter().find(|r| r.id == id) else {
                bail!("No record with id {}", id);
            };

            store.remove(record)?;
            println!("Record {} deleted", id);
            Ok(())
        }
        SleepTrackCommand::Stats {
            sleep_threshold,
            wake_threshold,
        } => {
            let records = store.load();
            if records.is_empty() {
                println!("No data to show yet.");
                return Ok(());
            }

            let thresholds = LatenessThresholds {
                sleep: sleep_threshold,
                wake: wake_threshold,
            };

            for (record, flags) in records.iter().zip(lateness_flags(&records, thresholds)) {
                println!(
                    "{}: sleep {}{} wake {}{}",
                    record.date,
                    record.actual_sleep.format_hm(),
                    if flags.sleep_late { " (late)" } else { "" },
                    record.actual_wake.format_hm(),
                    if flags.wake_late { " (late)" } else { "" },
                );
            }

            if let Some(averages) = SleepAverages::from_records(&records) {
                println!("\n{}", averages);
            }
            Ok(())
        }
    }
}

/// The reason policy belongs to the core: a reason is stored only when the
/// actual time was strictly later than expected under the applicable rule.
fn keep_reason(reason: Option<String>, required: bool, which: &str) -> String {
    match (reason, required) {
        (Some(reason), true) => reason,
        (None, true) => {
            warn!("{} was later than expected and no --reason-{} given", which, which);
            String::new()
        }
        (Some(_), false) => {
            warn!("--reason-{} ignored, {} was not later than expected", which, which);
            String::new()
        }
        (None, false) => String::new(),
    }
}

fn print_record(record: &SleepRecord) {
    println!(
        "{} [{}] sleep {} -> {} | wake {} -> {}",
        record.date,
        record.id,
        record.expected_sleep.format_hm(),
        record.actual_sleep.format_hm(),
        record.expected_wake.format_hm(),
        record.actual_wake.format_hm(),
    );
    if !record.reason_sleep.is_empty() {
        println!("    reason (sleep): {}", record.reason_sleep);
    }
    if !record.reason_wake.is_empty() {
        println!("    reason (wake): {}", record.reason_wake);
    }
}
