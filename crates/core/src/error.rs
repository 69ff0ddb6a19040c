//! Error types for the lead scoring engine

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::offer::OfferType;

/// Result alias used across the engine crates
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors
///
/// Only configuration gaps, rejected input and store failures are errors.
/// "No match" outcomes (no patterns, no eligible offers) are plain empty
/// results and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown offer type: {0}")]
    UnknownOfferType(String),

    #[error("Unknown discount tier: {0}")]
    UnknownDiscountTier(String),

    #[error("Unknown proficiency level: {0}")]
    UnknownLevel(String),

    #[error("Unknown account role: {0}")]
    UnknownRole(String),

    #[error("Offer catalog has no {table} entry for {offer_type}")]
    MissingCatalogEntry {
        offer_type: OfferType,
        table: &'static str,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Offer {offer_id} expired at {expired_at}")]
    OfferExpired {
        offer_id: String,
        expired_at: DateTime<Utc>,
    },

    #[error("Store error: {0}")]
    Store(String),
}
