//! Store traits for scores, offers and error history
//!
//! The engine never talks to a database directly. Stores are injected as
//! trait objects so that an in-memory map, a SQL table or a key-value
//! service can sit behind the same scoring logic.
//!
//! All operations are synchronous; implementations must be safe to share
//! across threads. `put` has overwrite semantics: the last write for a key
//! wins and nothing is merged.

use crate::{DynamicOffer, ErrorEvent, LeadScore, Result};

/// Most recent lead score per user
pub trait LeadScoreStore: Send + Sync {
    /// Get the stored score for a user
    fn get(&self, user_id: &str) -> Result<Option<LeadScore>>;

    /// Store a score, replacing any previous score for the same user
    fn put(&self, score: LeadScore) -> Result<()>;

    /// All stored scores
    fn list(&self) -> Result<Vec<LeadScore>>;
}

/// Dynamic offers keyed by offer id
pub trait OfferStore: Send + Sync {
    /// Get an offer by id
    fn get(&self, offer_id: &str) -> Result<Option<DynamicOffer>>;

    /// Store an offer, replacing any offer with the same id
    fn put(&self, offer: DynamicOffer) -> Result<()>;

    /// All stored offers
    fn list(&self) -> Result<Vec<DynamicOffer>>;

    /// Remove an offer, returning it if present
    fn remove(&self, offer_id: &str) -> Result<Option<DynamicOffer>>;

    /// Offers belonging to one user, oldest first
    ///
    /// Offers created in the same instant are ordered by their sequence.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<DynamicOffer>> {
        let mut offers: Vec<_> = self
            .list()?
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .collect();
        offers.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.sequence.cmp(&b.sequence))
                .then_with(|| a.offer_id.cmp(&b.offer_id))
        });
        Ok(offers)
    }
}

/// Append-only error history per user
pub trait ErrorHistoryStore: Send + Sync {
    /// Append an event, returning the new history length
    fn append(&self, user_id: &str, event: ErrorEvent) -> Result<usize>;

    /// Events for a user in insertion order
    fn history(&self, user_id: &str) -> Result<Vec<ErrorEvent>>;

    /// Drop a user's history
    fn clear(&self, user_id: &str) -> Result<()>;
}
