//! Application context owning the engine state
//!
//! The host calls `tick(today)` before any operation so that the day
//! boundary is applied explicitly. Every mutation goes through a method
//! here; ledger and tracker emit events and the session routes them to the
//! experience engine.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use log::{debug, info};

use crate::db::StateStore;
use crate::engine::badges::{self, BadgeDef, BadgeStats, ExternalProgress};
use crate::engine::estimator::{self, DebtEstimate, EstimateError, EstimatorPolicy};
use crate::engine::ledger::LedgerEvent;
use crate::engine::projector;
use crate::models::{
    BadgeState, DailyPrayerState, DebtLedger, ExperienceState, PrayerType, QadaProfile, Snapshot,
    SNAPSHOT_VERSION,
};

#[derive(Debug, Clone, Default)]
pub struct Session {
    policy: EstimatorPolicy,
    profile: Option<QadaProfile>,
    ledger: DebtLedger,
    daily: DailyPrayerState,
    experience: ExperienceState,
    badges: BadgeState,
}

impl Session {
    pub fn new(policy: EstimatorPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn from_snapshot(snapshot: Snapshot, policy: EstimatorPolicy) -> Self {
        let Snapshot {
            profile,
            ledger,
            daily,
            mut experience,
            badges,
            ..
        } = snapshot;
        experience.normalize();
        Self {
            policy,
            profile,
            ledger,
            daily,
            experience,
            badges,
        }
    }

    /// Restore from a store; anything unreadable yields a fresh session.
    pub fn load(store: &dyn StateStore, policy: EstimatorPolicy) -> Result<Self> {
        let raw = store.load().context("Loading saved state")?;
        Ok(Self::from_snapshot(Snapshot::restore(raw.as_deref()), policy))
    }

    pub fn save(&self, store: &dyn StateStore) -> Result<()> {
        store.save(&self.snapshot()).context("Saving state")
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            profile: self.profile.clone(),
            ledger: self.ledger.clone(),
            daily: self.daily.clone(),
            experience: self.experience.clone(),
            badges: self.badges.clone(),
        }
    }

    pub fn profile(&self) -> Option<&QadaProfile> {
        self.profile.as_ref()
    }

    pub fn ledger(&self) -> &DebtLedger {
        &self.ledger
    }

    pub fn daily(&self) -> &DailyPrayerState {
        &self.daily
    }

    pub fn experience(&self) -> &ExperienceState {
        &self.experience
    }

    pub fn badges(&self) -> &BadgeState {
        &self.badges
    }

    pub fn is_onboarded(&self) -> bool {
        self.profile.is_some()
    }

    // ─── Day boundary ───────────────────────────────────────────────────────

    pub fn tick(&mut self, today: NaiveDate) {
        self.daily.tick(today);
    }

    // ─── Onboarding ─────────────────────────────────────────────────────────

    /// Estimate debt from the questionnaire and replace the current debt.
    pub fn onboard(&mut self, profile: QadaProfile) -> Result<DebtEstimate, EstimateError> {
        let estimate = estimator::estimate(&profile, &self.policy)?;
        info!(
            "Onboarded: {} prayers and {} fasts owed",
            estimate.initial_prayer_debt, estimate.initial_fasting_debt
        );
        self.ledger.seed(&estimate);
        self.profile = Some(profile);
        Ok(estimate)
    }

    // ─── Ledger operations ──────────────────────────────────────────────────

    /// Mark one of today's prayers. Returns false if it was already marked.
    pub fn mark_daily_prayer(&mut self, prayer: PrayerType) -> bool {
        let events = self.daily.mark(prayer);
        if events.is_empty() {
            return false;
        }
        self.ledger.count_daily_prayer();
        self.dispatch(&events);
        true
    }

    /// Catch up one missed prayer.
    pub fn validate_one_qada(&mut self) {
        let event = self.ledger.validate_one_qada();
        self.dispatch(&[event]);
    }

    /// One prayer that both fulfils today's `prayer` and pays down a unit of
    /// debt. If today's flag was already set only the debt side applies.
    pub fn validate_double_shot(&mut self, prayer: PrayerType) {
        let mut events = self.daily.mark(prayer);
        self.ledger.count_daily_prayer();
        events.push(self.ledger.pay_down_prayer());
        self.dispatch(&events);
    }

    /// Log a fast. Returns false when that date was already logged.
    pub fn validate_one_fasting(&mut self, voluntary: bool, date: NaiveDate) -> bool {
        match self.ledger.validate_one_fasting(voluntary, date) {
            Some(event) => {
                self.dispatch(&[event]);
                true
            }
            None => false,
        }
    }

    pub fn adjust_prayer_debt(&mut self, delta: i64) {
        self.ledger.adjust_prayer_debt(delta);
    }

    pub fn adjust_fasting_debt(&mut self, delta: i64) {
        self.ledger.adjust_fasting_debt(delta);
    }

    pub fn adjust_fasting_completed(&mut self, delta: i64) {
        self.ledger.adjust_fasting_completed(delta);
    }

    pub fn set_intention(&mut self, date: Option<NaiveDate>) {
        self.ledger.set_intention(date);
    }

    pub fn complete_wudu_guide(&mut self) -> bool {
        self.ledger.complete_wudu_guide()
    }

    fn dispatch(&mut self, events: &[LedgerEvent]) {
        for event in events {
            debug!("Event: {:?}", event);
            self.experience.apply(event);
        }
    }

    // ─── Projection ─────────────────────────────────────────────────────────

    pub fn project_completion<Tz: TimeZone>(
        &self,
        daily_rate: f64,
        now: DateTime<Tz>,
    ) -> Option<DateTime<Tz>> {
        projector::project_completion(self.ledger.prayer_debt, daily_rate, now)
    }

    pub fn project_fasting_completion<Tz: TimeZone>(
        &self,
        daily_rate: f64,
        now: DateTime<Tz>,
    ) -> Option<DateTime<Tz>> {
        projector::project_completion(self.ledger.fasting_debt, daily_rate, now)
    }

    // ─── Levels & badges ────────────────────────────────────────────────────

    pub fn acknowledge_level_up(&mut self) {
        self.experience.acknowledge_level_up();
    }

    pub fn badge_stats(&self, progress: &ExternalProgress) -> BadgeStats {
        BadgeStats {
            prayers_validated: self.ledger.total_prayers_validated,
            qada_prayers: self.ledger.lifetime_prayer_score,
            prayer_streak: self.daily.prayer_streak,
            fasts_completed: self.ledger.fasting_completed,
            voluntary_fasts: self.ledger.voluntary_fasts(),
            experience: self.experience.experience,
            level: self.experience.level,
            wudu_guide_completed: self.ledger.wudu_guide_completed,
            progress: progress.clone(),
        }
    }

    /// Unlock every badge whose check newly passes and return them.
    pub fn evaluate_badges(&mut self, progress: &ExternalProgress) -> Vec<&'static BadgeDef> {
        let stats = self.badge_stats(progress);
        let newly = badges::evaluate(&stats, &self.badges.unlocked_badge_ids);
        self.badges.unlock(&newly);
        newly
    }

    pub fn acknowledge_badge(&mut self) {
        self.badges.acknowledge_badge();
    }
}
