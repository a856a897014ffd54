use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Durable debt counters. Mutated only through the operations in
/// `engine::ledger`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtLedger {
    /// Estimate captured at onboarding; denominator for progress.
    pub initial_prayer_debt: u64,
    pub prayer_debt: u64,
    pub fasting_debt: u64,
    pub fasting_completed: u64,
    /// Fasts logged so far, voluntary and qada alike. Gaps between dates do
    /// not reset it.
    pub fasting_streak: u32,
    pub lifetime_prayer_score: u64,
    pub total_prayers_validated: u64,
    pub voluntary_fast_dates: BTreeSet<NaiveDate>,
    pub qada_fast_dates: BTreeSet<NaiveDate>,
    pub intention_date: Option<NaiveDate>,
    pub wudu_guide_completed: bool,
}
