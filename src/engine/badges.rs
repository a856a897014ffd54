//! Badge definitions and unlock evaluation
//!
//! Badges live in a static table; each entry carries its own check so new
//! badges never touch the evaluator. Unlocks are permanent.

use log::debug;
use std::collections::BTreeSet;

use crate::models::BadgeState;

/// Progress reported by collaborators outside the ledger (Quran reader,
/// Tajwid lessons, prophet stories).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalProgress {
    pub surahs_read: u64,
    pub tajwid_lessons: u64,
    pub completed_stories: BTreeSet<String>,
}

/// Aggregate statistics the badge checks run against.
#[derive(Debug, Clone, Default)]
pub struct BadgeStats {
    pub prayers_validated: u64,
    pub qada_prayers: u64,
    pub prayer_streak: u32,
    pub fasts_completed: u64,
    pub voluntary_fasts: u64,
    pub experience: u64,
    pub level: u32,
    pub wudu_guide_completed: bool,
    pub progress: ExternalProgress,
}

/// Badge category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeCategory {
    Prayer,
    Streak,
    Qada,
    Fasting,
    Level,
    Quran,
    Tajwid,
    Stories,
    Wudu,
}

impl BadgeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prayer => "Prayer",
            Self::Streak => "Streaks",
            Self::Qada => "Qada",
            Self::Fasting => "Fasting",
            Self::Level => "Levels",
            Self::Quran => "Quran",
            Self::Tajwid => "Tajwid",
            Self::Stories => "Prophet Stories",
            Self::Wudu => "Wudu",
        }
    }
}

/// How a badge decides it has been earned.
#[derive(Clone, Copy)]
pub enum BadgeCheck {
    /// Metric must reach the badge's `requirement`.
    AtLeast(fn(&BadgeStats) -> u64),
    /// A specific prophet story must be completed.
    Story(&'static str),
    /// A boolean flag must be set.
    Flag(fn(&BadgeStats) -> bool),
}

#[derive(Clone)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub category: BadgeCategory,
    pub requirement: u64,
    pub check: BadgeCheck,
}

impl std::fmt::Debug for BadgeDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeDef")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("requirement", &self.requirement)
            .finish()
    }
}

impl BadgeDef {
    pub fn is_satisfied(&self, stats: &BadgeStats) -> bool {
        match self.check {
            BadgeCheck::AtLeast(metric) => metric(stats) >= self.requirement,
            BadgeCheck::Story(story) => stats.progress.completed_stories.contains(story),
            BadgeCheck::Flag(flag) => flag(stats),
        }
    }

    pub fn get(id: &str) -> Option<&'static BadgeDef> {
        BADGES.iter().find(|b| b.id == id)
    }
}

fn prayers_validated(s: &BadgeStats) -> u64 {
    s.prayers_validated
}
fn prayer_streak(s: &BadgeStats) -> u64 {
    u64::from(s.prayer_streak)
}
fn qada_prayers(s: &BadgeStats) -> u64 {
    s.qada_prayers
}
fn all_fasts(s: &BadgeStats) -> u64 {
    s.fasts_completed + s.voluntary_fasts
}
fn qada_fasts(s: &BadgeStats) -> u64 {
    s.fasts_completed
}
fn voluntary_fasts(s: &BadgeStats) -> u64 {
    s.voluntary_fasts
}
fn level(s: &BadgeStats) -> u64 {
    u64::from(s.level)
}
fn surahs_read(s: &BadgeStats) -> u64 {
    s.progress.surahs_read
}
fn tajwid_lessons(s: &BadgeStats) -> u64 {
    s.progress.tajwid_lessons
}
fn stories_completed(s: &BadgeStats) -> u64 {
    s.progress.completed_stories.len() as u64
}
fn wudu_guide(s: &BadgeStats) -> bool {
    s.wudu_guide_completed
}

macro_rules! badge {
    ($id:literal, $name:literal, $cat:ident, $req:expr, $check:expr) => {
        BadgeDef {
            id: $id,
            name: $name,
            category: BadgeCategory::$cat,
            requirement: $req,
            check: $check,
        }
    };
}

/// All badges, in evaluation order.
pub static BADGES: &[BadgeDef] = &[
    badge!("first_prayer", "First Step", Prayer, 1, BadgeCheck::AtLeast(prayers_validated)),
    badge!("prayers_100", "Steadfast", Prayer, 100, BadgeCheck::AtLeast(prayers_validated)),
    badge!("prayers_1000", "Pillar", Prayer, 1000, BadgeCheck::AtLeast(prayers_validated)),
    badge!("streak_3", "Three Days", Streak, 3, BadgeCheck::AtLeast(prayer_streak)),
    badge!("streak_7", "Full Week", Streak, 7, BadgeCheck::AtLeast(prayer_streak)),
    badge!("streak_30", "Full Month", Streak, 30, BadgeCheck::AtLeast(prayer_streak)),
    badge!("first_qada", "Making Amends", Qada, 1, BadgeCheck::AtLeast(qada_prayers)),
    badge!("qada_100", "Hundred Repaid", Qada, 100, BadgeCheck::AtLeast(qada_prayers)),
    badge!("qada_1000", "Thousand Repaid", Qada, 1000, BadgeCheck::AtLeast(qada_prayers)),
    badge!("first_fast", "First Fast", Fasting, 1, BadgeCheck::AtLeast(all_fasts)),
    badge!("qada_fasts_30", "A Month Restored", Fasting, 30, BadgeCheck::AtLeast(qada_fasts)),
    badge!("voluntary_10", "Beyond Duty", Fasting, 10, BadgeCheck::AtLeast(voluntary_fasts)),
    badge!("level_5", "Rising", Level, 5, BadgeCheck::AtLeast(level)),
    badge!("level_10", "Devoted", Level, 10, BadgeCheck::AtLeast(level)),
    badge!("first_surah", "First Surah", Quran, 1, BadgeCheck::AtLeast(surahs_read)),
    badge!("surahs_30", "Thirty Surahs", Quran, 30, BadgeCheck::AtLeast(surahs_read)),
    badge!("all_surahs", "Khatm", Quran, 114, BadgeCheck::AtLeast(surahs_read)),
    badge!("tajwid_5", "Reciter", Tajwid, 5, BadgeCheck::AtLeast(tajwid_lessons)),
    badge!("story_adam", "The First Prophet", Stories, 1, BadgeCheck::Story("adam")),
    badge!("stories_5", "Storyteller", Stories, 5, BadgeCheck::AtLeast(stories_completed)),
    badge!("wudu_guide", "Purified", Wudu, 1, BadgeCheck::Flag(wudu_guide)),
];

/// Badges not yet in `unlocked` whose check now passes, in table order.
pub fn evaluate(stats: &BadgeStats, unlocked: &BTreeSet<String>) -> Vec<&'static BadgeDef> {
    BADGES
        .iter()
        .filter(|b| !unlocked.contains(b.id))
        .filter(|b| b.is_satisfied(stats))
        .collect()
}

impl BadgeState {
    /// Record a batch of unlocks. The last one becomes the pending
    /// notification; the rest unlock silently.
    pub fn unlock(&mut self, badges: &[&'static BadgeDef]) {
        for badge in badges {
            if self.unlocked_badge_ids.insert(badge.id.to_string()) {
                debug!("Badge unlocked: {}", badge.id);
                self.last_unlocked_badge_id = Some(badge.id.to_string());
            }
        }
    }

    pub fn acknowledge_badge(&mut self) {
        self.last_unlocked_badge_id = None;
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_badge_ids.contains(id)
    }
}
