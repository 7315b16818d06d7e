//! Daily screen-time and break statistics.
//!
//! The ledger is the in-memory source of truth for the running timer. Each
//! change is written through to a [`StatsRepository`](crate::StatsRepository)
//! as absolute day totals, so a failed write is repaired by the next one.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one local calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub screen_time_seconds: u64,
    pub breaks_taken: u64,
}

/// Map of local date to that day's totals.
///
/// Serializes as a JSON object keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsLedger {
    days: BTreeMap<NaiveDate, DailyStat>,
}

/// Aggregate over a range of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub days: u64,
    pub screen_time_seconds: u64,
    pub breaks_taken: u64,
}

/// One row of a day-by-day report; days without data are zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub stat: DailyStat,
}

impl StatsLedger {
    pub(crate) fn len(&self) -> usize {
        self.days.len()
    }

    pub fn insert(&mut self, date: NaiveDate, stat: DailyStat) {
        self.days.insert(date, stat);
    }

    /// Totals for `date`, zero if nothing was recorded.
    pub fn day(&self, date: NaiveDate) -> DailyStat {
        self.days.get(&date).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DailyStat)> {
        self.days.iter()
    }

    /// Add active seconds to `date`, creating the entry if needed.
    /// Returns the new totals for that day.
    pub fn add_screen_time(&mut self, date: NaiveDate, seconds: u64) -> DailyStat {
        let entry = self.days.entry(date).or_default();
        entry.screen_time_seconds = entry.screen_time_seconds.saturating_add(seconds);
        *entry
    }

    /// Count one completed break on `date`. Returns the new totals for that day.
    pub fn record_break(&mut self, date: NaiveDate) -> DailyStat {
        let entry = self.days.entry(date).or_default();
        entry.breaks_taken = entry.breaks_taken.saturating_add(1);
        *entry
    }

    /// Seven days ending at `today` (inclusive), oldest first.
    pub fn week(&self, today: NaiveDate) -> Vec<DayEntry> {
        (0..7)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset);
                DayEntry {
                    date,
                    stat: self.day(date),
                }
            })
            .collect()
    }
}

impl StatsSummary {
    /// Summary of a day-by-day report.
    pub fn of(entries: &[DayEntry]) -> Self {
        entries.iter().fold(
            StatsSummary {
                days: entries.len() as u64,
                ..StatsSummary::default()
            },
            |mut acc, entry| {
                acc.screen_time_seconds += entry.stat.screen_time_seconds;
                acc.breaks_taken += entry.stat.breaks_taken;
                acc
            },
        )
    }

    pub fn screen_time_hours(&self) -> f64 {
        self.screen_time_seconds as f64 / 3600.0
    }
}
