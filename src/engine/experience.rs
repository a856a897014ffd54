//! Experience points and levels
//!
//! Level is derived as `floor(sqrt(xp / 10)) + 1`. Any increase of level
//! raises a sticky `level_up_pending` flag until the host acknowledges it.

use log::debug;

use crate::engine::ledger::LedgerEvent;
use crate::models::ExperienceState;

/// XP rewards for each kind of validated action
pub struct XpRewards;

impl XpRewards {
    /// A daily prayer marked on time
    pub const PRAYER_ON_TIME: u64 = 10;

    /// One missed prayer caught up
    pub const PRAYER_QADA: u64 = 15;

    /// All five daily prayers completed
    pub const ALL_FIVE_BONUS: u64 = 50;

    /// A voluntary (non-debt) fast
    pub const FAST_VOLUNTARY: u64 = 20;

    /// A fast that pays down fasting debt
    pub const FAST_QADA: u64 = 30;

    pub fn for_event(event: &LedgerEvent) -> u64 {
        match event {
            LedgerEvent::DailyPrayerMarked(_) => Self::PRAYER_ON_TIME,
            LedgerEvent::DailyPrayersCompleted { .. } => Self::ALL_FIVE_BONUS,
            LedgerEvent::QadaPrayerValidated => Self::PRAYER_QADA,
            LedgerEvent::FastLogged { voluntary: true, .. } => Self::FAST_VOLUNTARY,
            LedgerEvent::FastLogged { voluntary: false, .. } => Self::FAST_QADA,
        }
    }
}

/// Level for a given amount of experience.
pub fn level_for_xp(xp: u64) -> u32 {
    ((xp / 10).isqrt() + 1) as u32
}

/// Minimum experience needed to reach `level`, saturating at `u64::MAX`.
pub fn xp_for_level(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    steps.saturating_mul(steps).saturating_mul(10)
}

impl ExperienceState {
    pub fn new(experience: u64) -> Self {
        Self {
            experience,
            level: level_for_xp(experience),
            level_up_pending: false,
        }
    }

    /// Add experience; returns true if this raised the level.
    pub fn add_experience(&mut self, amount: u64) -> bool {
        if amount == 0 {
            return false;
        }
        let old_level = self.level;
        self.experience = self.experience.saturating_add(amount);
        self.level = level_for_xp(self.experience);

        if self.level > old_level {
            debug!("Level up: {} -> {}", old_level, self.level);
            self.level_up_pending = true;
            return true;
        }
        false
    }

    /// Award the experience attached to a domain event.
    pub fn apply(&mut self, event: &LedgerEvent) -> bool {
        self.add_experience(XpRewards::for_event(event))
    }

    pub fn acknowledge_level_up(&mut self) {
        self.level_up_pending = false;
    }

    /// Re-derive `level` after loading a stored state.
    pub fn normalize(&mut self) {
        self.level = level_for_xp(self.experience);
    }

    /// Progress to the next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        let floor = xp_for_level(self.level);
        let next = xp_for_level(self.level.saturating_add(1));
        let span = next.saturating_sub(floor);
        if span == 0 {
            1.0
        } else {
            (self.experience.saturating_sub(floor)) as f32 / span as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerType;

    #[test]
    fn test_max_experience_does_not_overflow() {
        let xp = ExperienceState::new(u64::MAX);
        assert_eq!(xp.level, 1_358_187_914);
        assert_eq!(xp_for_level(u32::MAX), u64::MAX);
        assert_eq!(xp_for_level(xp.level.saturating_add(1)), u64::MAX);

        let progress = xp.progress_to_next();
        assert!((0.0..=1.0).contains(&progress));

        let mut saturated = ExperienceState::new(u64::MAX - 5);
        assert!(!saturated.add_experience(100));
        assert_eq!(saturated.experience, u64::MAX);
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(9), 1);
        assert_eq!(level_for_xp(10), 2);
        assert_eq!(level_for_xp(39), 2);
        assert_eq!(level_for_xp(40), 3);
        assert_eq!(level_for_xp(90), 4);
        assert_eq!(level_for_xp(250), 6);
        assert_eq!(level_for_xp(255), 6);
    }

    #[test]
    fn test_xp_for_level_matches_formula() {
        for level in 1..50 {
            assert_eq!(level_for_xp(xp_for_level(level)), level);
            if level > 1 {
                assert_eq!(level_for_xp(xp_for_level(level) - 1), level - 1);
            }
        }
    }

    #[test]
    fn test_level_up_is_sticky_and_collapsed() {
        let mut xp = ExperienceState::default();
        assert!(xp.add_experience(10));
        assert_eq!(xp.level, 2);
        assert!(xp.level_up_pending);

        // Jump several levels before acknowledging: still a single flag.
        assert!(xp.add_experience(240));
        assert_eq!(xp.level, 6);
        assert!(xp.level_up_pending);

        xp.acknowledge_level_up();
        assert!(!xp.level_up_pending);

        assert!(!xp.add_experience(5));
        assert!(!xp.level_up_pending);
    }

    #[test]
    fn test_apply_event_rewards() {
        let mut xp = ExperienceState::default();
        xp.apply(&LedgerEvent::DailyPrayerMarked(PrayerType::Fajr));
        xp.apply(&LedgerEvent::QadaPrayerValidated);
        assert_eq!(xp.experience, XpRewards::PRAYER_ON_TIME + XpRewards::PRAYER_QADA);
    }

    #[test]
    fn test_progress_to_next() {
        let xp = ExperienceState::new(65); // level 3 spans 40..90
        assert_eq!(xp.level, 3);
        assert!((xp.progress_to_next() - 0.5).abs() < 0.01);
    }
}
