//! Qada debt engine: estimation, daily tracking, ledger, projection,
//! experience and badges.

pub mod badges;
pub mod clock;
pub mod estimator;
pub mod experience;
pub mod ledger;
pub mod projector;
pub mod session;
pub mod tracker;

pub use badges::{BadgeCategory, BadgeDef, BadgeStats, ExternalProgress, BADGES};
pub use clock::{Clock, FixedClock, SystemClock};
pub use estimator::{DebtEstimate, EstimateError, EstimatorPolicy};
pub use experience::XpRewards;
pub use ledger::LedgerEvent;
pub use session::Session;
