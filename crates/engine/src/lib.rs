//! Lead scoring and dynamic offer engine
//!
//! Turns raw error events and a learner profile into:
//! - Per-domain error patterns (`analyzer`)
//! - Readiness, urgency and value sub-scores and a lead status (`classifier`)
//! - Ranked, tiered offer recommendations (`recommender`, `discount`)
//! - Priced, time-boxed offers (`offer_builder`)
//!
//! `potential_lead` handles C1 learners with chronic management failures and
//! `conversion` flags free users ready for an upgrade. `LeadScoringEngine`
//! ties these to the stores and clock.

pub mod analyzer;
pub mod classifier;
pub mod conversion;
pub mod discount;
pub mod engine;
pub mod offer_builder;
pub mod potential_lead;
pub mod recommender;

pub use analyzer::ErrorPatternAnalyzer;
pub use classifier::{Classification, LeadClassifier};
pub use conversion::ConversionDetector;
pub use discount::select_discount_tier;
pub use engine::{LeadAnalysis, LeadScoringEngine};
pub use offer_builder::OfferBuilder;
pub use potential_lead::PotentialLeadGate;
pub use recommender::OfferRecommender;
