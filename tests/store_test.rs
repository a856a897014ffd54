//! Persistence of the engine snapshot and collaborator progress in SQLite.

use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::TempDir;

use qada::db::migrations::run_migrations;
use qada::db::repository::{MetaRepo, ProgressKind, ProgressRepo, SnapshotRepo};
use qada::db::{MemoryStore, SqliteStore, StateStore};
use qada::engine::experience::xp_for_level;
use qada::engine::{EstimatorPolicy, Session};
use qada::models::{PrayerType, Snapshot};

fn open_db(dir: &TempDir) -> Connection {
    let conn = Connection::open(dir.path().join("qada.db")).unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn fresh_database_yields_default_session() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(&dir);
    let store = SqliteStore::new(&conn);

    assert!(store.load().unwrap().is_none());
    let session = Session::load(&store, EstimatorPolicy::default()).unwrap();
    assert_eq!(session.snapshot(), Snapshot::default());
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let expected = {
        let conn = open_db(&dir);
        let store = SqliteStore::new(&conn);
        let mut session = Session::load(&store, EstimatorPolicy::default()).unwrap();
        session.tick(date("2025-03-10"));
        session.adjust_prayer_debt(40);
        session.validate_double_shot(PrayerType::Zuhr);
        session.validate_one_fasting(true, date("2025-03-10"));
        session.set_intention(Some(date("2025-03-11")));
        session.save(&store).unwrap();
        session.snapshot()
    };

    let conn = open_db(&dir);
    let store = SqliteStore::new(&conn);
    let mut session = Session::load(&store, EstimatorPolicy::default()).unwrap();
    assert_eq!(session.snapshot(), expected);
    assert_eq!(session.ledger().prayer_debt, 39);

    // Same day: today's flags remain.
    session.tick(date("2025-03-10"));
    assert!(session.daily().is_marked(PrayerType::Zuhr));
}

#[test]
fn corrupt_blob_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(&dir);
    SnapshotRepo::put(&conn, 1, "{\"ledger\": {\"prayer_debt\": \"lots\"}}").unwrap();

    let store = SqliteStore::new(&conn);
    let session = Session::load(&store, EstimatorPolicy::default()).unwrap();
    assert_eq!(session.snapshot(), Snapshot::default());
}

#[test]
fn save_overwrites_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(&dir);
    let store = SqliteStore::new(&conn);

    let mut session = Session::new(EstimatorPolicy::default());
    session.adjust_fasting_debt(3);
    session.save(&store).unwrap();
    session.adjust_fasting_debt(-1);
    session.save(&store).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM state_snapshot", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    let restored = Session::load(&store, EstimatorPolicy::default()).unwrap();
    assert_eq!(restored.ledger().fasting_debt, 2);
}

#[test]
fn memory_store_roundtrip() {
    let store = MemoryStore::new();
    let mut session = Session::new(EstimatorPolicy::default());
    session.tick(date("2025-01-01"));
    session.mark_daily_prayer(PrayerType::Fajr);
    session.save(&store).unwrap();
    assert!(store.blob().unwrap().contains("\"fajr\":true"));

    let restored = Session::load(&store, EstimatorPolicy::default()).unwrap();
    assert_eq!(restored.snapshot(), session.snapshot());

    let broken = MemoryStore::with_blob("garbage");
    let fresh = Session::load(&broken, EstimatorPolicy::default()).unwrap();
    assert_eq!(fresh.snapshot(), Snapshot::default());
}

#[test]
fn restored_max_experience_stays_usable() {
    let store = MemoryStore::with_blob(r#"{"version":1,"experience":{"experience":18446744073709551615}}"#);
    let mut session = Session::load(&store, EstimatorPolicy::default()).unwrap();
    session.tick(date("2025-03-01"));

    let xp = session.experience();
    assert_eq!(xp.experience, u64::MAX);
    assert_eq!(xp.level, 1_358_187_914);
    assert_eq!(xp_for_level(xp.level.saturating_add(1)), u64::MAX);
    assert!((0.0..=1.0).contains(&xp.progress_to_next()));

    session.validate_one_qada();
    assert_eq!(session.experience().experience, u64::MAX);
    assert!(!session.experience().level_up_pending);
}

#[test]
fn external_progress_feeds_badges() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(&dir);

    assert_eq!(ProgressRepo::increment(&conn, ProgressKind::TajwidLessons, 3).unwrap(), 3);
    assert_eq!(ProgressRepo::increment(&conn, ProgressKind::TajwidLessons, 2).unwrap(), 5);
    assert!(ProgressRepo::complete_story(&conn, " Adam ").unwrap());
    assert!(!ProgressRepo::complete_story(&conn, "adam").unwrap());

    let progress = ProgressRepo::load(&conn).unwrap();
    assert_eq!(progress.tajwid_lessons, 5);
    assert_eq!(progress.surahs_read, 0);
    assert!(progress.completed_stories.contains("adam"));

    let mut session = Session::new(EstimatorPolicy::default());
    let ids: Vec<_> = session
        .evaluate_badges(&progress)
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec!["tajwid_5", "story_adam"]);
}

#[test]
fn meta_and_migrations_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(&dir);
    run_migrations(&conn).unwrap();

    assert_eq!(MetaRepo::get(&conn, "onboarded_at").unwrap(), None);
    MetaRepo::set(&conn, "onboarded_at", "2025-03-10").unwrap();
    MetaRepo::set(&conn, "onboarded_at", "2025-03-11").unwrap();
    assert_eq!(
        MetaRepo::get(&conn, "onboarded_at").unwrap().as_deref(),
        Some("2025-03-11")
    );
}
