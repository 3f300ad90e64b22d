use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::pomo::BoundaryEvent;

/// One finished (or skipped) interval, as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalRecord {
    pub kind: String,
    pub planned_secs: u64,
    pub elapsed_secs: u64,
    pub skipped: bool,
    pub timestamp: DateTime<Local>,
}

impl IntervalRecord {
    pub fn from_boundary(event: &BoundaryEvent, timestamp: DateTime<Local>) -> Self {
        Self {
            kind: event.finished_kind.to_string(),
            planned_secs: event.planned_secs,
            elapsed_secs: event.elapsed_secs,
            skipped: event.skipped,
            timestamp,
        }
    }
}

/// Database of finished intervals. Failures opening or writing it are
/// non-fatal to the timer; callers hold it as an `Option`.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at the default state-directory location.
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::history_db_path().unwrap_or_else(|| PathBuf::from("pomo_history.db"));
        Self::open(&db_path)
    }

    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS intervals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                planned_secs INTEGER NOT NULL,
                elapsed_secs INTEGER NOT NULL,
                skipped BOOLEAN NOT NULL,
                timestamp TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_intervals_timestamp ON intervals(timestamp)",
            [],
        )?;

        Ok(HistoryDb { conn })
    }

    pub fn record_interval(&self, record: &IntervalRecord) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO intervals (kind, planned_secs, elapsed_secs, skipped, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.kind,
                record.planned_secs,
                record.elapsed_secs,
                record.skipped,
                record.timestamp.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Number of work intervals run to completion on the given local date.
    pub fn work_sessions_on(&self, date: &str) -> Result<i64> {
        self.conn.query_row(
            r#"
            SELECT COUNT(*) FROM intervals
            WHERE kind = 'Work' AND skipped = 0 AND timestamp LIKE ?1
            "#,
            [format!("{}%", date)],
            |row| row.get(0),
        )
    }

    pub fn work_sessions_today(&self) -> Result<i64> {
        self.work_sessions_on(&Local::now().format("%Y-%m-%d").to_string())
    }

    /// The most recently recorded interval, if any.
    pub fn last_interval(&self) -> Result<Option<IntervalRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, planned_secs, elapsed_secs, skipped, timestamp
            FROM intervals
            ORDER BY id DESC
            LIMIT 1
            "#,
        )?;

        let mut rows = stmt.query_map([], |row| {
            let timestamp_str: String = row.get(4)?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        4,
                        "timestamp".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(IntervalRecord {
                kind: row.get(0)?,
                planned_secs: row.get::<_, i64>(1)? as u64,
                elapsed_secs: row.get::<_, i64>(2)? as u64,
                skipped: row.get(3)?,
                timestamp,
            })
        })?;

        rows.next().transpose()
    }
}

/// Append one boundary to the plain-text session log, emitting the header
/// when the file is first created.
pub fn append_log_line(log_path: &Path, record: &IntervalRecord) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = !log_path.exists();

    let mut log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_path)?;

    if needs_header {
        writeln!(log_file, "date,kind,planned_secs,elapsed_secs,skipped")?;
    }

    writeln!(
        log_file,
        "{},{},{},{},{}",
        record.timestamp.format("%c"),
        record.kind,
        record.planned_secs,
        record.elapsed_secs,
        record.skipped,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{BoundaryKind, IntervalKind};
    use tempfile::tempdir;

    fn sample_record(kind: IntervalKind, skipped: bool) -> IntervalRecord {
        let event = BoundaryEvent {
            finished_index: 1,
            classification: BoundaryKind::WorkFinished,
            finished_kind: kind,
            planned_secs: 1500,
            elapsed_secs: if skipped { 60 } else { 1500 },
            skipped,
        };
        IntervalRecord::from_boundary(&event, Local::now())
    }

    #[test]
    fn record_and_read_back_last_interval() {
        let dir = tempdir().unwrap();
        let db = HistoryDb::open(&dir.path().join("history.db")).unwrap();

        db.record_interval(&sample_record(IntervalKind::Work, false))
            .unwrap();
        db.record_interval(&sample_record(IntervalKind::ShortBreak, true))
            .unwrap();

        let last = db.last_interval().unwrap().expect("a row");
        assert_eq!(last.kind, "Short Break");
        assert!(last.skipped);
        assert_eq!(last.elapsed_secs, 60);
    }

    #[test]
    fn empty_db_has_no_last_interval() {
        let dir = tempdir().unwrap();
        let db = HistoryDb::open(&dir.path().join("history.db")).unwrap();
        assert_eq!(db.last_interval().unwrap(), None);
    }

    #[test]
    fn work_sessions_counts_only_completed_work() {
        let dir = tempdir().unwrap();
        let db = HistoryDb::open(&dir.path().join("history.db")).unwrap();

        db.record_interval(&sample_record(IntervalKind::Work, false))
            .unwrap();
        db.record_interval(&sample_record(IntervalKind::Work, true))
            .unwrap();
        db.record_interval(&sample_record(IntervalKind::ShortBreak, false))
            .unwrap();

        let today = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(db.work_sessions_on(&today).unwrap(), 1);
        assert_eq!(db.work_sessions_on("1999-01-01").unwrap(), 0);
    }

    #[test]
    fn log_line_appends_with_header_once() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("log.csv");

        append_log_line(&log_path, &sample_record(IntervalKind::Work, false)).unwrap();
        append_log_line(&log_path, &sample_record(IntervalKind::ShortBreak, true)).unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,kind,planned_secs,elapsed_secs,skipped");
        assert!(lines[1].contains("Work"));
        assert!(lines[2].contains("Short Break"));
    }
}
