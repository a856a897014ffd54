use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{BadgeState, DailyPrayerState, DebtLedger, ExperienceState, QadaProfile};

/// Current layout version of the persisted state blob. Fields are only ever
/// added; old blobs load with defaults for anything they lack.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Flat, serializable copy of everything the engine owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub version: u32,
    pub profile: Option<QadaProfile>,
    pub ledger: DebtLedger,
    pub daily: DailyPrayerState,
    pub experience: ExperienceState,
    pub badges: BadgeState,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            profile: None,
            ledger: DebtLedger::default(),
            daily: DailyPrayerState::default(),
            experience: ExperienceState::default(),
            badges: BadgeState::default(),
        }
    }
}

impl Snapshot {
    /// Decode a stored blob. Missing, unparsable or future-version blobs
    /// fall back to the fresh-install state.
    pub fn restore(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match serde_json::from_str::<Snapshot>(raw) {
            Ok(snapshot) if snapshot.version == 0 || snapshot.version > SNAPSHOT_VERSION => {
                warn!(
                    "Unsupported snapshot version {} (expected <= {}), starting fresh",
                    snapshot.version, SNAPSHOT_VERSION
                );
                Self::default()
            }
            Ok(mut snapshot) => {
                snapshot.version = SNAPSHOT_VERSION;
                snapshot
            }
            Err(e) => {
                warn!("Discarding corrupt snapshot: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
