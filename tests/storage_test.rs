//! Integration tests for the SQLite persistence layer
//!
//! Run with: cargo test --test storage_test

use gpabot::storage::db::{
    append_log, distinct_user_ids, get_user, log_by_verification_id, logs_by_user, new_verification_id, recent_logs,
    upsert_user, BreakdownRow, LogKind, NewLogRecord, UserProfile,
};
use gpabot::storage::{create_pool, get_connection, DbPool};
use tempfile::TempDir;

fn test_pool(dir: &TempDir) -> DbPool {
    let path = dir.path().join("test.sqlite");
    create_pool(path.to_str().unwrap()).unwrap()
}

fn profile(id: i64, username: &str) -> UserProfile {
    UserProfile {
        telegram_id: id,
        username: Some(username.to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

fn gpa_record(user_id: i64, verification_id: &str) -> NewLogRecord {
    NewLogRecord {
        user_id,
        gpa: "3.57".to_string(),
        kind: LogKind::Gpa,
        verification_id: verification_id.to_string(),
        breakdown: vec![BreakdownRow {
            course: "Applied Mathematics II(Math. 1042)".to_string(),
            credit: 5,
            score: 95.0,
            letter: "A+".to_string(),
            point: 4.0,
        }],
    }
}

#[test]
fn upsert_is_idempotent_and_updates_fields() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir);
    let conn = get_connection(&pool).unwrap();

    upsert_user(&conn, &profile(100, "old_name")).unwrap();
    upsert_user(&conn, &profile(100, "new_name")).unwrap();

    let (stored, last_active) = get_user(&conn, 100).unwrap().unwrap();
    assert_eq!(stored.username.as_deref(), Some("new_name"));
    assert!(!last_active.is_empty());

    assert_eq!(distinct_user_ids(&conn).unwrap(), vec![100]);
}

#[test]
fn unknown_user_reads_back_as_none() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir);
    let conn = get_connection(&pool).unwrap();

    assert!(get_user(&conn, 9999).unwrap().is_none());
}

#[test]
fn appended_log_round_trips_through_verification_lookup() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir);
    let conn = get_connection(&pool).unwrap();

    let id = new_verification_id();
    append_log(&conn, &gpa_record(7, &id)).unwrap();

    let record = log_by_verification_id(&conn, &id).unwrap().unwrap();
    assert_eq!(record.user_id, 7);
    assert_eq!(record.gpa, "3.57");
    assert_eq!(record.kind, LogKind::Gpa);
    assert_eq!(record.verification_id.as_deref(), Some(id.as_str()));
    assert_eq!(record.breakdown.len(), 1);
    assert_eq!(record.breakdown[0].letter, "A+");
    assert_eq!(record.breakdown[0].credit, 5);

    assert!(log_by_verification_id(&conn, "no-such-id").unwrap().is_none());
}

#[test]
fn history_is_per_user_newest_first_and_limited() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir);
    let conn = get_connection(&pool).unwrap();

    for i in 0..5 {
        let mut record = gpa_record(1, &format!("user1-{}", i));
        record.gpa = format!("3.{}0", i);
        append_log(&conn, &record).unwrap();
    }
    append_log(&conn, &gpa_record(2, "user2-0")).unwrap();

    let records = logs_by_user(&conn, 1, 3).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.user_id == 1));
    // Newest first
    assert_eq!(records[0].gpa, "3.40");
    assert_eq!(records[2].gpa, "3.20");

    let all = recent_logs(&conn, 10).unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].user_id, 2);
}

#[test]
fn distinct_user_ids_covers_all_known_users() {
    let dir = TempDir::new().unwrap();
    let pool = test_pool(&dir);
    let conn = get_connection(&pool).unwrap();

    for id in [3, 1, 2] {
        upsert_user(&conn, &profile(id, &format!("user{}", id))).unwrap();
    }
    // A second interaction must not duplicate the recipient
    upsert_user(&conn, &profile(2, "user2")).unwrap();

    assert_eq!(distinct_user_ids(&conn).unwrap(), vec![1, 2, 3]);
}

#[test]
fn legacy_logs_table_gains_verification_id_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.sqlite");

    // A database from before verification ids existed
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE logs (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                gpa       TEXT NOT NULL,
                kind      TEXT NOT NULL,
                breakdown TEXT NOT NULL
            );",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO logs (user_id, timestamp, gpa, kind, breakdown)
             VALUES (5, '2024-01-01T00:00:00+00:00', '3.00', 'GPA', '[]')",
            [],
        )
        .unwrap();
    }

    let pool = create_pool(path.to_str().unwrap()).unwrap();
    let conn = get_connection(&pool).unwrap();

    // Old rows survive with a NULL verification id
    let old = logs_by_user(&conn, 5, 10).unwrap();
    assert_eq!(old.len(), 1);
    assert!(old[0].verification_id.is_none());

    // New rows can use the migrated column
    append_log(&conn, &gpa_record(5, "fresh-id")).unwrap();
    assert!(log_by_verification_id(&conn, "fresh-id").unwrap().is_some());
}

#[test]
fn verification_ids_are_unique_and_opaque() {
    let a = new_verification_id();
    let b = new_verification_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}
