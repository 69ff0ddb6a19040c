//! Core types and traits for the lead scoring engine
//!
//! This crate provides the foundational records shared by every other crate:
//! - Learner profiles (proficiency level, account role)
//! - Raw error events and the per-domain patterns derived from them
//! - Lead scores, offer recommendations and dynamic offers
//! - Coaching session summaries used for conversion detection
//! - Store and clock traits so persistence and time are pluggable
//! - Error types

pub mod conversion;
pub mod error;
pub mod events;
pub mod lead;
pub mod offer;
pub mod profile;
pub mod traits;

pub use conversion::{ConversionAction, ConversionCandidate, SessionSummary};
pub use error::{Error, Result};
pub use events::{ErrorCategory, ErrorEvent, ErrorPattern, DEFAULT_DOMAIN};
pub use lead::{LeadScore, LeadStatus, OfferRecommendation};
pub use offer::{DiscountTier, DynamicOffer, Money, OfferAcceptance, OfferType};
pub use profile::{AccountRole, ProficiencyLevel, UserProfile};

pub use traits::{
    Clock, ErrorHistoryStore, FixedClock, LeadScoreStore, OfferStore, SystemClock,
};
