//! Daily prayer completion and the full-day streak.

use chrono::NaiveDate;
use log::debug;

use crate::engine::ledger::LedgerEvent;
use crate::models::{DailyCompletions, DailyPrayerState, PrayerType};

impl DailyPrayerState {
    /// Align the tracked day with `today`.
    ///
    /// The streak survives the rollover only when the day being closed had
    /// all five prayers and `today` directly follows it; a skipped day in
    /// between counts as a day with nothing marked. Marks made before the
    /// first tick belong to no day and are dropped.
    pub fn tick(&mut self, today: NaiveDate) {
        let Some(tracked) = self.tracked_date else {
            self.completions = DailyCompletions::default();
            self.tracked_date = Some(today);
            return;
        };
        if tracked == today {
            return;
        }

        let consecutive = tracked.succ_opt() == Some(today);
        if !(self.completions.all_done() && consecutive) && self.prayer_streak > 0 {
            debug!(
                "Prayer streak of {} reset at rollover {} -> {}",
                self.prayer_streak, tracked, today
            );
            self.prayer_streak = 0;
        }

        self.completions = DailyCompletions::default();
        self.tracked_date = Some(today);
    }

    /// Mark one of today's prayers. Re-marking is a no-op and yields no events.
    pub fn mark(&mut self, prayer: PrayerType) -> Vec<LedgerEvent> {
        if self.completions.get(prayer) {
            debug!("{} already marked for {:?}", prayer, self.tracked_date);
            return Vec::new();
        }

        self.completions.set(prayer, true);
        let mut events = vec![LedgerEvent::DailyPrayerMarked(prayer)];

        if self.completions.all_done() {
            self.prayer_streak += 1;
            self.best_streak = self.best_streak.max(self.prayer_streak);
            debug!("All five prayers done, streak now {}", self.prayer_streak);
            events.push(LedgerEvent::DailyPrayersCompleted {
                streak: self.prayer_streak,
            });
        }
        events
    }

    pub fn is_marked(&self, prayer: PrayerType) -> bool {
        self.completions.get(prayer)
    }
}
