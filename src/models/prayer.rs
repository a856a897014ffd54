use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerType {
    Fajr,
    Zuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerType {
    pub fn all() -> [PrayerType; 5] {
        [
            PrayerType::Fajr,
            PrayerType::Zuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "fajr",
            PrayerType::Zuhr => "zuhr",
            PrayerType::Asr => "asr",
            PrayerType::Maghrib => "maghrib",
            PrayerType::Isha => "isha",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Zuhr => "Zuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
        }
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fajr" => Ok(PrayerType::Fajr),
            "zuhr" | "dhuhr" | "dhuhur" => Ok(PrayerType::Zuhr),
            "asr" => Ok(PrayerType::Asr),
            "maghrib" => Ok(PrayerType::Maghrib),
            "isha" => Ok(PrayerType::Isha),
            _ => Err(anyhow::anyhow!("Unknown prayer type: {}", s)),
        }
    }
}

/// Completion flags for the five daily prayers of a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCompletions {
    #[serde(default)]
    pub fajr: bool,
    #[serde(default)]
    pub zuhr: bool,
    #[serde(default)]
    pub asr: bool,
    #[serde(default)]
    pub maghrib: bool,
    #[serde(default)]
    pub isha: bool,
}

impl DailyCompletions {
    pub fn get(&self, prayer: PrayerType) -> bool {
        match prayer {
            PrayerType::Fajr => self.fajr,
            PrayerType::Zuhr => self.zuhr,
            PrayerType::Asr => self.asr,
            PrayerType::Maghrib => self.maghrib,
            PrayerType::Isha => self.isha,
        }
    }

    pub fn set(&mut self, prayer: PrayerType, done: bool) {
        let slot = match prayer {
            PrayerType::Fajr => &mut self.fajr,
            PrayerType::Zuhr => &mut self.zuhr,
            PrayerType::Asr => &mut self.asr,
            PrayerType::Maghrib => &mut self.maghrib,
            PrayerType::Isha => &mut self.isha,
        };
        *slot = done;
    }

    pub fn count_done(&self) -> u8 {
        PrayerType::all()
            .iter()
            .filter(|p| self.get(**p))
            .count() as u8
    }

    pub fn all_done(&self) -> bool {
        self.count_done() == 5
    }
}
