//! In-memory persistence for the lead scoring engine
//!
//! Provides storage for:
//! - Lead scores (latest per user)
//! - Dynamic offers (by offer id)
//! - Error history (append-only, per user)
//!
//! All stores are process-local maps behind `parking_lot::RwLock`. They
//! implement the store traits from `fluency-leads-core`, so a database-backed
//! store can replace them without touching the engine.

pub mod error_history;
pub mod lead_scores;
pub mod offers;

pub use error_history::InMemoryErrorHistoryStore;
pub use lead_scores::InMemoryLeadScoreStore;
pub use offers::InMemoryOfferStore;

use std::sync::Arc;

/// Combined in-memory persistence layer
#[derive(Clone, Default)]
pub struct PersistenceLayer {
    pub lead_scores: Arc<InMemoryLeadScoreStore>,
    pub offers: Arc<InMemoryOfferStore>,
    pub error_history: Arc<InMemoryErrorHistoryStore>,
}

impl PersistenceLayer {
    pub fn in_memory() -> Self {
        Self::default()
    }
}
