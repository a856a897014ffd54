use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::DailyCompletions;

/// Today's five prayer flags plus the full-day streak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyPrayerState {
    pub completions: DailyCompletions,
    /// Day the completions belong to; `None` before the first tick.
    pub tracked_date: Option<NaiveDate>,
    pub prayer_streak: u32,
    /// Longest streak ever reached.
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceState {
    pub experience: u64,
    pub level: u32,
    pub level_up_pending: bool,
}

impl Default for ExperienceState {
    fn default() -> Self {
        Self {
            experience: 0,
            level: 1,
            level_up_pending: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeState {
    /// Append-only.
    pub unlocked_badge_ids: BTreeSet<String>,
    pub last_unlocked_badge_id: Option<String>,
}
