use clap::Subcommand;
use serde::Serialize;
use visionguard_core::stats::DayEntry;
use visionguard_core::{Clock, StatsDb, StatsLedger, StatsRepository, StatsSummary, SystemClock};

use super::CommandResult;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's screen time and breaks
    Today,
    /// The last seven days, oldest first
    Week,
    /// Every recorded day
    All,
}

#[derive(Serialize)]
struct Report<'a> {
    days: &'a [DayEntry],
    summary: StatsSummary,
    screen_time_hours: f64,
}

fn report(days: &[DayEntry]) -> Report<'_> {
    let summary = StatsSummary::of(days);
    Report {
        days,
        screen_time_hours: (summary.screen_time_hours() * 100.0).round() / 100.0,
        summary,
    }
}

fn entries(ledger: &StatsLedger) -> Vec<DayEntry> {
    ledger
        .iter()
        .map(|(date, stat)| DayEntry {
            date: *date,
            stat: *stat,
        })
        .collect()
}

pub fn run(action: StatsAction) -> CommandResult {
    let db = StatsDb::open()?;
    let today = SystemClock.today();

    match action {
        StatsAction::Today => {
            let entry = DayEntry {
                date: today,
                stat: db.day(today)?,
            };
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        StatsAction::Week => {
            let week = db.load_all()?.week(today);
            println!("{}", serde_json::to_string_pretty(&report(&week))?);
        }
        StatsAction::All => {
            let all = entries(&db.load_all()?);
            println!("{}", serde_json::to_string_pretty(&report(&all))?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use visionguard_core::DailyStat;

    #[test]
    fn report_sums_days_and_rounds_hours() {
        let mut ledger = StatsLedger::default();
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        ledger.insert(
            date,
            DailyStat {
                screen_time_seconds: 5400,
                breaks_taken: 4,
            },
        );
        ledger.insert(
            date.pred_opt().unwrap(),
            DailyStat {
                screen_time_seconds: 1800,
                breaks_taken: 1,
            },
        );

        let all = entries(&ledger);
        let report = report(&all);
        assert_eq!(report.summary.days, 2);
        assert_eq!(report.summary.breaks_taken, 5);
        assert_eq!(report.screen_time_hours, 2.0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["days"][0]["date"], "2026-10-18");
        assert_eq!(value["days"][1]["screen_time_seconds"], 5400);
    }
}
