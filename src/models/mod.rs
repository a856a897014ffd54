pub mod ledger;
pub mod prayer;
pub mod profile;
pub mod snapshot;
pub mod stats;

pub use ledger::DebtLedger;
pub use prayer::{DailyCompletions, PrayerType};
pub use profile::QadaProfile;
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use stats::{BadgeState, DailyPrayerState, ExperienceState};
