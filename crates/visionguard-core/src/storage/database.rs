//! SQLite-based daily statistics storage.
//!
//! One row per local calendar day holding the absolute screen-time and
//! break totals for that day. Rows are upserted, never deleted, and a write
//! can never lower a stored counter.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::time::Duration;

use super::{data_dir, migrations, StatsRepository};
use crate::error::{DatabaseError, Result};
use crate::stats::{DailyStat, StatsLedger};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database for daily statistics.
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open the database at `~/.config/visionguard/visionguard.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("visionguard.db"))
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        // The daemon writes every second while CLI invocations read.
        conn.busy_timeout(Duration::from_secs(2))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Totals for a single day, zero if nothing was recorded.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn day(&self, date: NaiveDate) -> Result<DailyStat> {
        let mut stmt = self
            .conn
            .prepare("SELECT screen_time_secs, breaks_taken FROM daily_stats WHERE date = ?1")?;
        let result = stmt.query_row(params![date.format(DATE_FORMAT).to_string()], |row| {
            Ok(DailyStat {
                screen_time_seconds: row.get::<_, u64>(0)?,
                breaks_taken: row.get::<_, u64>(1)?,
            })
        });
        match result {
            Ok(stat) => Ok(stat),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(DailyStat::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl StatsRepository for StatsDb {
    fn load_all(&self) -> Result<StatsLedger> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, screen_time_secs, breaks_taken FROM daily_stats ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut ledger = StatsLedger::default();
        for row in rows {
            let (date, screen_time_seconds, breaks_taken) = row?;
            let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| {
                DatabaseError::CorruptRow {
                    table: "daily_stats".into(),
                    message: format!("bad date '{date}': {e}"),
                }
            })?;
            ledger.insert(
                date,
                DailyStat {
                    screen_time_seconds,
                    breaks_taken,
                },
            );
        }
        Ok(ledger)
    }

    fn put(&self, date: NaiveDate, stat: &DailyStat) -> Result<()> {
        self.conn.execute(
            "INSERT INTO daily_stats (date, screen_time_secs, breaks_taken, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(date) DO UPDATE SET
                screen_time_secs = MAX(daily_stats.screen_time_secs, excluded.screen_time_secs),
                breaks_taken     = MAX(daily_stats.breaks_taken, excluded.breaks_taken),
                updated_at       = excluded.updated_at",
            params![
                date.format(DATE_FORMAT).to_string(),
                stat.screen_time_seconds,
                stat.breaks_taken,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
