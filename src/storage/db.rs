//! SQLite persistence adapter.
//!
//! Two stores: `users` (profile upserted on every interaction, never
//! deleted) and `logs` (append-only calculation records with a JSON
//! per-course breakdown). All reads needed by history, verification and
//! broadcast recipient discovery live here.

use chrono::Utc;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, AppResult};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Whether a record is a semester GPA or a cumulative GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogKind {
    Gpa,
    Cgpa,
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Gpa => "GPA",
            LogKind::Cgpa => "CGPA",
        }
    }

    fn from_db(s: &str) -> Self {
        // Only the two spellings below are ever written; anything else is
        // an old hand-edited row and reads back as GPA.
        if s == "CGPA" {
            LogKind::Cgpa
        } else {
            LogKind::Gpa
        }
    }
}

/// One line of a persisted breakdown. For GPA records `course` is a course
/// name and `score` a 0–100 mark; for CGPA records `course` is a semester
/// label and `score` the semester GPA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub course: String,
    pub credit: u32,
    pub score: f64,
    pub letter: String,
    pub point: f64,
}

/// A calculation record as read back from the `logs` table.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub id: i64,
    pub user_id: i64,
    pub timestamp: String,
    /// Two-decimal string, as presented to the user.
    pub gpa: String,
    pub kind: LogKind,
    pub verification_id: Option<String>,
    pub breakdown: Vec<BreakdownRow>,
}

/// A record to append. The timestamp is assigned at insert time.
#[derive(Debug, Clone)]
pub struct NewLogRecord {
    pub user_id: i64,
    pub gpa: String,
    pub kind: LogKind,
    pub verification_id: String,
    pub breakdown: Vec<BreakdownRow>,
}

/// User profile fields captured from the chat transport.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Create a new database connection pool
///
/// Initializes a pool with up to 10 connections and ensures the schema is
/// up to date on the first connection.
pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    let conn = pool.get()?;
    if let Err(e) = init_schema(&conn) {
        log::warn!("Failed to initialize schema: {}", e);
    }

    Ok(pool)
}

/// Get a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, r2d2::Error> {
    pool.get()
}

/// Creates tables and adds columns missing from older databases.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            telegram_id INTEGER PRIMARY KEY,
            username    TEXT,
            first_name  TEXT,
            last_name   TEXT,
            last_active TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS logs (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL,
            timestamp       TEXT NOT NULL,
            gpa             TEXT NOT NULL,
            kind            TEXT NOT NULL,
            verification_id TEXT,
            breakdown       TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_logs_user ON logs(user_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_logs_verification ON logs(verification_id);",
    )?;
    migrate_schema(conn)
}

/// Adds columns introduced after the first release to existing tables.
fn migrate_schema(conn: &Connection) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(logs)")?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<_>>()?;

    // verification_id was added after the first deployments
    if !columns.contains(&"verification_id".to_string()) {
        log::info!("Adding missing column: verification_id to logs table");
        if let Err(e) = conn.execute("ALTER TABLE logs ADD COLUMN verification_id TEXT", []) {
            log::warn!("Failed to add verification_id column: {}", e);
        }
    }

    Ok(())
}

/// Upserts a user profile and stamps the activity time. Called on every
/// interaction; users are never deleted.
pub fn upsert_user(conn: &Connection, profile: &UserProfile) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (telegram_id, username, first_name, last_name, last_active)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(telegram_id) DO UPDATE SET
            username = excluded.username,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            last_active = excluded.last_active",
        params![
            profile.telegram_id,
            profile.username,
            profile.first_name,
            profile.last_name,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Reads back a stored profile.
pub fn get_user(conn: &Connection, telegram_id: i64) -> AppResult<Option<(UserProfile, String)>> {
    let row = conn
        .query_row(
            "SELECT telegram_id, username, first_name, last_name, last_active
             FROM users WHERE telegram_id = ?1",
            params![telegram_id],
            |row| {
                Ok((
                    UserProfile {
                        telegram_id: row.get(0)?,
                        username: row.get(1)?,
                        first_name: row.get(2)?,
                        last_name: row.get(3)?,
                    },
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    Ok(row)
}

/// Appends one calculation record. Records are never mutated afterwards.
pub fn append_log(conn: &Connection, record: &NewLogRecord) -> AppResult<()> {
    let breakdown = serde_json::to_string(&record.breakdown)?;
    conn.execute(
        "INSERT INTO logs (user_id, timestamp, gpa, kind, verification_id, breakdown)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.user_id,
            Utc::now().to_rfc3339(),
            record.gpa,
            record.kind.as_str(),
            record.verification_id,
            breakdown,
        ],
    )?;
    Ok(())
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(LogRecord, String)> {
    Ok((
        LogRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            timestamp: row.get(2)?,
            gpa: row.get(3)?,
            kind: LogKind::from_db(&row.get::<_, String>(4)?),
            verification_id: row.get(5)?,
            breakdown: Vec::new(),
        },
        row.get::<_, String>(6)?,
    ))
}

fn parse_breakdown(record: (LogRecord, String)) -> AppResult<LogRecord> {
    let (mut record, breakdown_json) = record;
    record.breakdown = serde_json::from_str(&breakdown_json)?;
    Ok(record)
}

/// Most recent records for one user, newest first.
pub fn logs_by_user(conn: &Connection, user_id: i64, limit: usize) -> AppResult<Vec<LogRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, timestamp, gpa, kind, verification_id, breakdown
         FROM logs WHERE user_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![user_id, limit as i64], row_to_record)?;
    rows.map(|r| parse_breakdown(r.map_err(AppError::from)?)).collect()
}

/// Looks up a record by its verification token.
pub fn log_by_verification_id(conn: &Connection, verification_id: &str) -> AppResult<Option<LogRecord>> {
    let row = conn
        .query_row(
            "SELECT id, user_id, timestamp, gpa, kind, verification_id, breakdown
             FROM logs WHERE verification_id = ?1",
            params![verification_id],
            row_to_record,
        )
        .optional()?;
    row.map(parse_breakdown).transpose()
}

/// Most recent records across all users, newest first.
pub fn recent_logs(conn: &Connection, limit: usize) -> AppResult<Vec<LogRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, timestamp, gpa, kind, verification_id, breakdown
         FROM logs ORDER BY timestamp DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit as i64], row_to_record)?;
    rows.map(|r| parse_breakdown(r.map_err(AppError::from)?)).collect()
}

/// Distinct chat ids known to the bot; the broadcast recipient list.
pub fn distinct_user_ids(conn: &Connection) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT telegram_id FROM users ORDER BY telegram_id")?;
    let ids = stmt.query_map([], |row| row.get(0))?;
    Ok(ids.collect::<rusqlite::Result<_>>()?)
}

/// Generates an opaque verification token for a completed calculation.
pub fn new_verification_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
