use serde::{Deserialize, Serialize};

/// One-time onboarding questionnaire used to seed the debt estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QadaProfile {
    pub current_age: f64,
    pub puberty_age: f64,
    /// Share of the obligations the user already kept, 0..=100.
    pub regularity_percent: u8,
    #[serde(default)]
    pub safety_margin_enabled: bool,
    #[serde(default)]
    pub is_female: bool,
}
