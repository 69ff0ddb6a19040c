//! Dynamic offer construction
//!
//! Prices a recommendation against the catalog and attaches copy and expiry.
//! Offer ids combine the user id, the creation second and a process-wide
//! sequence number, so two offers built in the same second stay distinct.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

use fluency_leads_config::OfferCatalog;
use fluency_leads_core::{DynamicOffer, OfferRecommendation, Result, UserProfile};

pub struct OfferBuilder {
    catalog: OfferCatalog,
    sequence: AtomicU64,
}

impl OfferBuilder {
    pub fn new(catalog: OfferCatalog) -> Self {
        Self {
            catalog,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &OfferCatalog {
        &self.catalog
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Build an offer for `recommendation`
    ///
    /// Fails with `MissingCatalogEntry` if the offer type has no price or
    /// name in the catalog.
    pub fn build(
        &self,
        profile: &UserProfile,
        recommendation: &OfferRecommendation,
        now: DateTime<Utc>,
    ) -> Result<DynamicOffer> {
        let offer_type = recommendation.offer_type;
        let tier = recommendation.discount_tier;

        let original_price = self.catalog.price(offer_type)?;
        let discount_amount = original_price.percent(tier.percentage());
        let final_price = original_price.saturating_sub(discount_amount);

        let sequence = self.next_sequence();
        let offer = DynamicOffer {
            offer_id: format!("OFFER-{}-{}-{}", profile.user_id, now.timestamp(), sequence),
            sequence,
            user_id: profile.user_id.clone(),
            offer_type,
            module_name: self.catalog.module_name(offer_type)?.to_string(),
            original_price,
            discount_tier: tier,
            discount_amount,
            final_price,
            urgency_message: self.catalog.urgency_message(tier)?.to_string(),
            benefits: self.catalog.benefits(offer_type, profile.current_level)?,
            social_proof: self.catalog.social_proof(offer_type)?.to_string(),
            created_at: now,
            expires_at: now + Duration::hours(tier.validity_hours()),
        };

        Ok(offer)
    }
}
