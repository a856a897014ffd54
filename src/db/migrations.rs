use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS state_snapshot (
            id        INTEGER PRIMARY KEY CHECK(id = 1),
            version   INTEGER NOT NULL,
            body      TEXT NOT NULL,
            saved_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS progress_counters (
            kind   TEXT PRIMARY KEY CHECK(kind IN ('surahs_read','tajwid_lessons')),
            value  INTEGER NOT NULL DEFAULT 0 CHECK(value >= 0)
        );

        CREATE TABLE IF NOT EXISTS completed_stories (
            story_id      TEXT PRIMARY KEY,
            completed_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;

    seed_counters(conn)?;
    Ok(())
}

fn seed_counters(conn: &Connection) -> Result<()> {
    for kind in ["surahs_read", "tajwid_lessons"] {
        conn.execute(
            "INSERT OR IGNORE INTO progress_counters (kind, value) VALUES (?1, 0)",
            rusqlite::params![kind],
        )?;
    }
    Ok(())
}
