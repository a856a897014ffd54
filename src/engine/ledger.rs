//! Debt ledger operations
//!
//! Every decrement saturates at zero. Operations that earn experience
//! return a `LedgerEvent`; the session forwards those to the experience
//! engine so the ledger never awards XP itself.

use chrono::NaiveDate;
use log::debug;

use crate::engine::estimator::DebtEstimate;
use crate::models::{DebtLedger, PrayerType};

/// Something the user did that is worth experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEvent {
    DailyPrayerMarked(PrayerType),
    DailyPrayersCompleted { streak: u32 },
    QadaPrayerValidated,
    FastLogged { voluntary: bool, date: NaiveDate },
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

impl DebtLedger {
    /// Replace the debt counters with a fresh estimate. History (logged
    /// fasts, lifetime score) is kept.
    pub fn seed(&mut self, estimate: &DebtEstimate) {
        debug!(
            "Seeding ledger: {} prayers, {} fasts",
            estimate.initial_prayer_debt, estimate.initial_fasting_debt
        );
        self.initial_prayer_debt = estimate.initial_prayer_debt;
        self.prayer_debt = estimate.initial_prayer_debt;
        self.fasting_debt = estimate.initial_fasting_debt;
        self.fasting_completed = 0;
    }

    /// Count one of today's prayers toward the validated total.
    pub fn count_daily_prayer(&mut self) {
        self.total_prayers_validated += 1;
    }

    /// Pay down one unit of prayer debt without counting a prayer.
    pub(crate) fn pay_down_prayer(&mut self) -> LedgerEvent {
        self.prayer_debt = self.prayer_debt.saturating_sub(1);
        self.lifetime_prayer_score += 1;
        LedgerEvent::QadaPrayerValidated
    }

    /// One missed prayer caught up, independent of today's prayers.
    pub fn validate_one_qada(&mut self) -> LedgerEvent {
        self.total_prayers_validated += 1;
        self.pay_down_prayer()
    }

    /// Log a fast on `date`. Logging the same date twice in the same set
    /// returns `None` and changes nothing.
    pub fn validate_one_fasting(&mut self, voluntary: bool, date: NaiveDate) -> Option<LedgerEvent> {
        if voluntary {
            if !self.voluntary_fast_dates.insert(date) {
                debug!("Voluntary fast on {} already logged", date);
                return None;
            }
        } else {
            if !self.qada_fast_dates.insert(date) {
                debug!("Qada fast on {} already logged", date);
                return None;
            }
            self.fasting_debt = self.fasting_debt.saturating_sub(1);
            self.fasting_completed += 1;
        }
        self.fasting_streak = self.fasting_streak.saturating_add(1);
        Some(LedgerEvent::FastLogged { voluntary, date })
    }

    pub fn adjust_prayer_debt(&mut self, delta: i64) {
        self.prayer_debt = apply_delta(self.prayer_debt, delta);
    }

    pub fn adjust_fasting_debt(&mut self, delta: i64) {
        self.fasting_debt = apply_delta(self.fasting_debt, delta);
    }

    pub fn adjust_fasting_completed(&mut self, delta: i64) {
        self.fasting_completed = apply_delta(self.fasting_completed, delta);
    }

    /// Replace the declared fasting intention; `None` clears it.
    pub fn set_intention(&mut self, date: Option<NaiveDate>) {
        self.intention_date = date;
    }

    pub fn has_intention_for(&self, date: NaiveDate) -> bool {
        self.intention_date == Some(date)
    }

    /// Returns true the first time the guide is completed.
    pub fn complete_wudu_guide(&mut self) -> bool {
        !std::mem::replace(&mut self.wudu_guide_completed, true)
    }

    /// Share of the initial prayer debt already caught up, in percent.
    pub fn prayer_progress(&self) -> f64 {
        if self.initial_prayer_debt == 0 {
            return 0.0;
        }
        let paid = self.initial_prayer_debt.saturating_sub(self.prayer_debt);
        (paid as f64 / self.initial_prayer_debt as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn voluntary_fasts(&self) -> u64 {
        self.voluntary_fast_dates.len() as u64
    }
}
