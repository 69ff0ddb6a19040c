//! Lead score types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::offer::{DiscountTier, OfferType};

/// Lead status, from least to most sales-ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Cold,
    Warm,
    Hot,
    /// Advanced learner with chronic management-domain failures
    PotentialLead,
    QualifiedLead,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
            Self::PotentialLead => "potential_lead",
            Self::QualifiedLead => "qualified_lead",
        }
    }

    /// Statuses that unlock the most aggressive discounts
    pub fn is_top_tier(&self) -> bool {
        matches!(self, Self::PotentialLead | Self::QualifiedLead)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candidate offer derived from one high-failure domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRecommendation {
    pub offer_type: OfferType,

    /// Domain the recommendation targets
    pub domain: String,

    pub failure_rate: f64,
    pub error_count: u32,
    pub discount_tier: DiscountTier,
    pub discount_percentage: u8,

    /// Ranking key only
    #[serde(skip_serializing)]
    #[serde(default)]
    pub priority: f64,
}

impl OfferRecommendation {
    pub fn new(
        offer_type: OfferType,
        domain: impl Into<String>,
        failure_rate: f64,
        error_count: u32,
        discount_tier: DiscountTier,
        priority: f64,
    ) -> Self {
        Self {
            offer_type,
            domain: domain.into(),
            failure_rate,
            error_count,
            discount_tier,
            discount_percentage: discount_tier.percentage(),
            priority,
        }
    }
}

/// Result of one scoring run for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub user_id: String,
    pub lead_status: LeadStatus,

    /// Weighted overall score (0-100)
    pub score: f64,

    /// Likelihood to convert (0-100)
    pub readiness_score: f64,

    /// Time sensitivity (0-100)
    pub urgency_score: f64,

    /// Lifetime value potential (0-100)
    pub value_score: f64,

    /// Human-readable reasons, in the order the rules fired
    pub triggers: Vec<String>,

    /// At most three, highest priority first
    pub recommended_offers: Vec<OfferRecommendation>,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LeadScore {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Highest-priority recommendation, if any
    pub fn top_recommendation(&self) -> Option<&OfferRecommendation> {
        self.recommended_offers.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert_eq!(LeadStatus::PotentialLead.as_str(), "potential_lead");
        assert_eq!(
            serde_json::to_string(&LeadStatus::QualifiedLead).unwrap(),
            "\"qualified_lead\""
        );
        assert!(LeadStatus::QualifiedLead.is_top_tier());
        assert!(!LeadStatus::Hot.is_top_tier());
    }

    #[test]
    fn test_recommendation_priority_not_serialized() {
        let rec = OfferRecommendation::new(
            OfferType::TechnicalWriting,
            "technical",
            0.5,
            6,
            DiscountTier::Premium,
            62.0,
        );
        assert_eq!(rec.discount_percentage, 20);

        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("priority").is_none());
        assert_eq!(json["offer_type"], "technical_writing_mastery");
        assert_eq!(json["discount_tier"], "premium");
    }
}
