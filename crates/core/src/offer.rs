//! Offer catalog keys, money and dynamic offers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

/// Amount of money in US cents
///
/// Prices are kept in integer cents so that discount arithmetic is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Convert a dollar amount, rounding to the nearest cent
    ///
    /// Negative and non-finite amounts are rejected.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() || dollars < 0.0 {
            return None;
        }
        Some(Self((dollars * 100.0).round() as u64))
    }

    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// `percent`% of this amount, rounded half-up to the nearest cent
    pub fn percent(&self, percent: u8) -> Money {
        Money((self.0 * percent as u64 + 50) / 100)
    }

    pub fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Upgrade module that can be offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OfferType {
    #[serde(rename = "executive_it_english_module")]
    ExecutiveModule,
    #[serde(rename = "advanced_business_communication")]
    AdvancedBusiness,
    #[serde(rename = "technical_writing_mastery")]
    TechnicalWriting,
    #[serde(rename = "negotiation_skills_pro")]
    NegotiationSkills,
}

impl OfferType {
    /// Every offer type; catalog validation checks each one has an entry
    pub const ALL: [OfferType; 4] = [
        OfferType::ExecutiveModule,
        OfferType::AdvancedBusiness,
        OfferType::TechnicalWriting,
        OfferType::NegotiationSkills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExecutiveModule => "executive_it_english_module",
            Self::AdvancedBusiness => "advanced_business_communication",
            Self::TechnicalWriting => "technical_writing_mastery",
            Self::NegotiationSkills => "negotiation_skills_pro",
        }
    }
}

impl std::fmt::Display for OfferType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OfferType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownOfferType(s.to_string()))
    }
}

/// Named discount level
///
/// The percentage and validity window are intrinsic to the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountTier {
    /// 10% off
    Standard,
    /// 20% off
    Premium,
    /// 30% off
    Exclusive,
    /// 40% off, shortest validity
    LimitedTime,
}

impl DiscountTier {
    pub const ALL: [DiscountTier; 4] = [
        DiscountTier::Standard,
        DiscountTier::Premium,
        DiscountTier::Exclusive,
        DiscountTier::LimitedTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Exclusive => "exclusive",
            Self::LimitedTime => "limited_time",
        }
    }

    /// Discount percentage
    pub fn percentage(&self) -> u8 {
        match self {
            Self::Standard => 10,
            Self::Premium => 20,
            Self::Exclusive => 30,
            Self::LimitedTime => 40,
        }
    }

    /// Hours an offer at this tier stays redeemable
    pub fn validity_hours(&self) -> i64 {
        match self {
            Self::LimitedTime => 24,
            Self::Exclusive => 48,
            Self::Standard | Self::Premium => 72,
        }
    }
}

impl std::fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DiscountTier::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnknownDiscountTier(s.to_string()))
    }
}

/// Personalized, priced and time-boxed upgrade offer
///
/// Immutable once created. Expiry is passive: callers compare `expires_at`
/// against the current time when the offer is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicOffer {
    pub offer_id: String,

    /// Creation order among offers from the same builder, also the id suffix
    #[serde(default)]
    pub sequence: u64,

    pub user_id: String,
    pub offer_type: OfferType,

    /// Display name of the module
    pub module_name: String,

    pub original_price: Money,
    pub discount_tier: DiscountTier,
    pub discount_amount: Money,
    pub final_price: Money,

    pub urgency_message: String,
    pub benefits: Vec<String>,
    pub social_proof: String,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl DynamicOffer {
    /// Expired once `now` is strictly past `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn discount_percentage(&self) -> u8 {
        self.discount_tier.percentage()
    }
}

/// Result of accepting an offer (checkout is handled elsewhere)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferAcceptance {
    pub order_id: String,
    pub offer_id: String,
    pub user_id: String,
    pub module_name: String,
    pub amount: Money,
    pub accepted_at: DateTime<Utc>,
}
