use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

use crate::engine::ExternalProgress;

// ─── State snapshot ──────────────────────────────────────────────────────────

pub struct SnapshotRepo;

impl SnapshotRepo {
    pub fn get(conn: &Connection) -> Result<Option<String>> {
        conn.query_row(
            "SELECT body FROM state_snapshot WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn put(conn: &Connection, version: u32, body: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO state_snapshot (id, version, body, saved_at)
             VALUES (1, ?1, ?2, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET version = ?1, body = ?2, saved_at = datetime('now')",
            params![version, body],
        )?;
        Ok(())
    }
}

// ─── External progress ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    SurahsRead,
    TajwidLessons,
}

impl ProgressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKind::SurahsRead => "surahs_read",
            ProgressKind::TajwidLessons => "tajwid_lessons",
        }
    }
}

pub struct ProgressRepo;

impl ProgressRepo {
    pub fn get_counter(conn: &Connection, kind: ProgressKind) -> Result<u64> {
        conn.query_row(
            "SELECT value FROM progress_counters WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get::<_, i64>(0),
        )
        .optional()
        .map(|v| v.unwrap_or(0).max(0) as u64)
        .map_err(anyhow::Error::from)
    }

    /// Add `amount` to a counter and return the new total.
    pub fn increment(conn: &Connection, kind: ProgressKind, amount: u32) -> Result<u64> {
        conn.execute(
            "INSERT INTO progress_counters (kind, value) VALUES (?1, ?2)
             ON CONFLICT(kind) DO UPDATE SET value = value + ?2",
            params![kind.as_str(), amount],
        )?;
        Self::get_counter(conn, kind)
    }

    /// Record a finished prophet story. Returns false if it was already done.
    pub fn complete_story(conn: &Connection, story_id: &str) -> Result<bool> {
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO completed_stories (story_id) VALUES (?1)",
            params![story_id.trim().to_lowercase()],
        )?;
        Ok(inserted > 0)
    }

    pub fn load(conn: &Connection) -> Result<ExternalProgress> {
        let mut stmt = conn.prepare("SELECT story_id FROM completed_stories ORDER BY story_id")?;
        let completed_stories: BTreeSet<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<_>>()?;

        Ok(ExternalProgress {
            surahs_read: Self::get_counter(conn, ProgressKind::SurahsRead)?,
            tajwid_lessons: Self::get_counter(conn, ProgressKind::TajwidLessons)?,
            completed_stories,
        })
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }
}
