//! Core traits for the lead scoring engine
//!
//! ```text
//! Stores (pluggable persistence, last-write-wins):
//!   - LeadScoreStore: most recent LeadScore per user id
//!   - OfferStore: DynamicOffer per offer id
//!   - ErrorHistoryStore: raw ErrorEvents per user id
//!
//! Time:
//!   - Clock: source of "now", frozen per scoring call
//! ```

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{ErrorHistoryStore, LeadScoreStore, OfferStore};
