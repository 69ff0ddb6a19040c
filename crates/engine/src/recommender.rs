//! Offer recommendation
//!
//! Turns chronic error patterns into ranked offer recommendations. Each
//! eligible pattern whose domain maps to an offer type yields one candidate;
//! candidates are ranked by `failure_rate * w1 + score * w2` and truncated.

use fluency_leads_config::{OfferCatalog, ScoringConfig};
use fluency_leads_core::{DiscountTier, ErrorPattern, LeadStatus, OfferRecommendation, OfferType};

use crate::discount::select_discount_tier;

#[derive(Debug, Clone, Copy)]
pub struct OfferRecommender<'a> {
    config: &'a ScoringConfig,
    catalog: &'a OfferCatalog,
}

impl<'a> OfferRecommender<'a> {
    pub fn new(config: &'a ScoringConfig, catalog: &'a OfferCatalog) -> Self {
        Self { config, catalog }
    }

    /// Ranked recommendations, highest priority first
    pub fn recommend(
        &self,
        patterns: &[ErrorPattern],
        status: LeadStatus,
        score: f64,
    ) -> Vec<OfferRecommendation> {
        let ranking = &self.config.offers;

        let mut candidates: Vec<OfferRecommendation> = patterns
            .iter()
            .filter(|p| self.config.eligibility.is_eligible(p))
            .filter_map(|pattern| {
                let Some(offer_type) = self.catalog.offer_for_domain(&pattern.domain) else {
                    tracing::trace!(domain = %pattern.domain, "No offer mapped to domain");
                    return None;
                };

                let tier = select_discount_tier(
                    status,
                    pattern.failure_rate,
                    ranking.limited_time_failure_rate,
                );
                let priority =
                    pattern.failure_rate * ranking.failure_rate_weight + score * ranking.score_weight;

                Some(OfferRecommendation::new(
                    offer_type,
                    pattern.domain.clone(),
                    pattern.failure_rate,
                    pattern.error_count,
                    tier,
                    priority,
                ))
            })
            .collect();

        // Stable: equal priorities keep pattern order
        candidates.sort_by(|a, b| b.priority.total_cmp(&a.priority));
        candidates.truncate(ranking.max_recommendations);
        candidates
    }

    /// The fixed recommendation used for a detected potential lead
    pub fn potential_lead_offer(&self, pattern: &ErrorPattern) -> OfferRecommendation {
        OfferRecommendation::new(
            OfferType::ExecutiveModule,
            self.config.eligibility.domain.clone(),
            pattern.failure_rate,
            pattern.error_count,
            DiscountTier::LimitedTime,
            self.config.offers.potential_lead_priority,
        )
    }
}
