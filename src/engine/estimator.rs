//! Lifetime debt estimate from the onboarding questionnaire.

use log::warn;
use thiserror::Error;

use crate::models::QadaProfile;

/// Average share of prayers exempted for menstruation over a lunar year.
pub const MENSTRUAL_EXEMPTION_RATIO: f64 = 0.233;

/// Extra margin applied when the user asks to err on the safe side.
pub const SAFETY_MARGIN: f64 = 0.10;

const DAYS_PER_YEAR: f64 = 365.0;
const PRAYERS_PER_DAY: f64 = 5.0;
const FASTS_PER_YEAR: f64 = 30.0;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("puberty age {puberty} is greater than current age {current}")]
    InvalidAges { current: f64, puberty: f64 },
    #[error("ages must be finite and non-negative")]
    NonFiniteAge,
    #[error("regularity must be between 0 and 100, got {0}")]
    RegularityOutOfRange(u8),
}

/// Multipliers applied on top of the raw years-missed count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorPolicy {
    pub exemption_ratio: f64,
    pub safety_margin: f64,
}

impl Default for EstimatorPolicy {
    fn default() -> Self {
        Self {
            exemption_ratio: MENSTRUAL_EXEMPTION_RATIO,
            safety_margin: SAFETY_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtEstimate {
    pub initial_prayer_debt: u64,
    pub initial_fasting_debt: u64,
}

pub fn estimate(profile: &QadaProfile, policy: &EstimatorPolicy) -> Result<DebtEstimate, EstimateError> {
    let QadaProfile {
        current_age,
        puberty_age,
        regularity_percent,
        safety_margin_enabled,
        is_female,
    } = *profile;

    if !current_age.is_finite() || !puberty_age.is_finite() || current_age < 0.0 || puberty_age < 0.0 {
        return Err(EstimateError::NonFiniteAge);
    }
    if puberty_age > current_age {
        warn!("Rejecting estimate: puberty age {} > current age {}", puberty_age, current_age);
        return Err(EstimateError::InvalidAges {
            current: current_age,
            puberty: puberty_age,
        });
    }
    if regularity_percent > 100 {
        return Err(EstimateError::RegularityOutOfRange(regularity_percent));
    }

    let years_missed = current_age - puberty_age;
    let missed_share = 1.0 - f64::from(regularity_percent) / 100.0;

    let mut prayers = years_missed * DAYS_PER_YEAR * PRAYERS_PER_DAY * missed_share;
    let mut fasting = years_missed * FASTS_PER_YEAR * missed_share;

    if is_female {
        prayers *= 1.0 - policy.exemption_ratio;
    }
    if safety_margin_enabled {
        prayers *= 1.0 + policy.safety_margin;
        fasting *= 1.0 + policy.safety_margin;
    }

    Ok(DebtEstimate {
        initial_prayer_debt: prayers.round().max(0.0) as u64,
        initial_fasting_debt: fasting.round().max(0.0) as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(current: f64, puberty: f64, regularity: u8) -> QadaProfile {
        QadaProfile {
            current_age: current,
            puberty_age: puberty,
            regularity_percent: regularity,
            safety_margin_enabled: false,
            is_female: false,
        }
    }

    #[test]
    fn test_half_regular_ten_years() {
        let est = estimate(&profile(23.0, 13.0, 50), &EstimatorPolicy::default()).unwrap();
        assert_eq!(est.initial_prayer_debt, 9125);
        assert_eq!(est.initial_fasting_debt, 150);
    }

    #[test]
    fn test_fully_regular_owes_nothing() {
        let est = estimate(&profile(40.0, 14.0, 100), &EstimatorPolicy::default()).unwrap();
        assert_eq!(est.initial_prayer_debt, 0);
        assert_eq!(est.initial_fasting_debt, 0);
    }

    #[test]
    fn test_female_exemption_applies_to_prayers_only() {
        let mut p = profile(23.0, 13.0, 0);
        p.is_female = true;
        let est = estimate(&p, &EstimatorPolicy::default()).unwrap();
        // 18250 * 0.767 = 13997.75
        assert_eq!(est.initial_prayer_debt, 13998);
        assert_eq!(est.initial_fasting_debt, 300);
    }

    #[test]
    fn test_safety_margin_applies_to_both() {
        let mut p = profile(23.0, 13.0, 50);
        p.safety_margin_enabled = true;
        let est = estimate(&p, &EstimatorPolicy::default()).unwrap();
        // 9125 * 1.1 = 10037.5, 150 * 1.1 = 165
        assert_eq!(est.initial_prayer_debt, 10038);
        assert_eq!(est.initial_fasting_debt, 165);
    }

    #[test]
    fn test_custom_policy() {
        let mut p = profile(11.0, 10.0, 0);
        p.is_female = true;
        p.safety_margin_enabled = true;
        let policy = EstimatorPolicy {
            exemption_ratio: 0.5,
            safety_margin: 1.0,
        };
        let est = estimate(&p, &policy).unwrap();
        // 1825 * 0.5 * 2 = 1825, 30 * 2 = 60
        assert_eq!(est.initial_prayer_debt, 1825);
        assert_eq!(est.initial_fasting_debt, 60);
    }

    #[test]
    fn test_inverted_ages_rejected() {
        let err = estimate(&profile(12.0, 15.0, 0), &EstimatorPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidAges {
                current: 12.0,
                puberty: 15.0
            }
        );
    }

    #[test]
    fn test_bad_inputs_rejected() {
        assert_eq!(
            estimate(&profile(30.0, 14.0, 101), &EstimatorPolicy::default()),
            Err(EstimateError::RegularityOutOfRange(101))
        );
        assert_eq!(
            estimate(&profile(f64::NAN, 14.0, 0), &EstimatorPolicy::default()),
            Err(EstimateError::NonFiniteAge)
        );
    }
}
