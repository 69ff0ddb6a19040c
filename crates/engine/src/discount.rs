//! Discount tier selection

use fluency_leads_core::{DiscountTier, LeadStatus};

/// Pick the discount tier for a lead status and observed failure rate
///
/// Top-tier leads get the limited-time tier once the failure rate reaches
/// `limited_time_failure_rate`, otherwise the exclusive tier.
pub fn select_discount_tier(
    status: LeadStatus,
    failure_rate: f64,
    limited_time_failure_rate: f64,
) -> DiscountTier {
    if status.is_top_tier() {
        return if failure_rate >= limited_time_failure_rate {
            DiscountTier::LimitedTime
        } else {
            DiscountTier::Exclusive
        };
    }

    match status {
        LeadStatus::Hot => DiscountTier::Premium,
        _ => DiscountTier::Standard,
    }
}
