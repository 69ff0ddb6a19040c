//! Potential-lead gate
//!
//! C1 learners with chronic failures in the potential-lead domain skip the
//! regular ranking and receive the executive module at the limited-time tier.

use fluency_leads_config::ScoringConfig;
use fluency_leads_core::{ErrorPattern, ProficiencyLevel, UserProfile};

#[derive(Debug, Clone, Copy)]
pub struct PotentialLeadGate<'a> {
    config: &'a ScoringConfig,
}

impl<'a> PotentialLeadGate<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// The pattern that opens the gate, if the profile qualifies
    pub fn matching_pattern<'p>(
        &self,
        profile: &UserProfile,
        patterns: &'p [ErrorPattern],
    ) -> Option<&'p ErrorPattern> {
        if profile.current_level != ProficiencyLevel::C1 {
            return None;
        }
        self.config.eligibility.potential_lead_pattern(patterns)
    }
}
