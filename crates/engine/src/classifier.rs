//! Lead classification
//!
//! Computes the three sub-scores from a profile and its error patterns,
//! combines them into the overall score and maps the result to a
//! [`LeadStatus`].
//!
//! - Readiness: proficiency, engagement, paid role, completed modules
//! - Urgency: chronic failure domains, recency of activity, weak areas
//! - Value: proficiency, paid role, account age
//!
//! Triggers are appended in rule order so the same inputs always produce the
//! same list.

use chrono::{DateTime, Utc};

use fluency_leads_config::ScoringConfig;
use fluency_leads_core::{ErrorPattern, LeadStatus, ProficiencyLevel, UserProfile};

/// Scores and status for one profile, before recommendations are attached
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: LeadStatus,
    pub score: f64,
    pub readiness_score: f64,
    pub urgency_score: f64,
    pub value_score: f64,
    pub triggers: Vec<String>,
}

/// Rule-based lead classifier
#[derive(Debug, Clone, Copy)]
pub struct LeadClassifier<'a> {
    config: &'a ScoringConfig,
}

impl<'a> LeadClassifier<'a> {
    pub fn new(config: &'a ScoringConfig) -> Self {
        Self { config }
    }

    /// Classify a profile at `now`
    pub fn classify(
        &self,
        profile: &UserProfile,
        patterns: &[ErrorPattern],
        now: DateTime<Utc>,
    ) -> Classification {
        let mut triggers = Vec::new();

        let readiness_score = self.readiness(profile, &mut triggers);
        let urgency_score = self.urgency(profile, patterns, now, &mut triggers);
        let value_score = self.value(profile, now, &mut triggers);

        let score = self
            .config
            .weights
            .combine(readiness_score, urgency_score, value_score);

        let status = self.status(score, self.is_potential_lead(profile, patterns));

        Classification {
            status,
            score,
            readiness_score,
            urgency_score,
            value_score,
            triggers,
        }
    }

    /// Likelihood to convert
    pub fn readiness(&self, profile: &UserProfile, triggers: &mut Vec<String>) -> f64 {
        let points = &self.config.readiness;
        let mut score = 0.0;

        if profile.current_level.is_advanced() {
            score += points.advanced_level;
            triggers.push(format!("Advanced level: {}", profile.current_level));
        } else if profile.current_level == ProficiencyLevel::B2 {
            score += points.upper_intermediate_level;
        } else {
            score += points.base_level;
        }

        if profile.total_sessions >= points.high_engagement_sessions {
            score += points.high_engagement;
            triggers.push(format!("High engagement: {} sessions", profile.total_sessions));
        } else if profile.total_sessions >= points.moderate_engagement_sessions {
            score += points.moderate_engagement;
        }

        if profile.current_role.is_paying() {
            score += points.paid_role;
            triggers.push(format!("Paid user: {}", profile.current_role));
        }

        if profile.modules_completed.len() >= points.committed_modules {
            score += points.committed;
        }

        score.clamp(0.0, self.config.max_sub_score())
    }

    /// Time sensitivity
    pub fn urgency(
        &self,
        profile: &UserProfile,
        patterns: &[ErrorPattern],
        now: DateTime<Utc>,
        triggers: &mut Vec<String>,
    ) -> f64 {
        let points = &self.config.urgency;
        let mut score = 0.0;

        for pattern in patterns
            .iter()
            .filter(|p| self.config.eligibility.is_eligible(p))
        {
            score += points.per_chronic_domain;
            triggers.push(format!(
                "Consistent failures in {}: {}% error rate",
                pattern.domain,
                pattern.failure_percentage()
            ));
        }

        let days_inactive = profile.days_since_active(now);
        if days_inactive <= points.recent_days {
            score += points.recent_activity;
            triggers.push(format!("Recently active (last {} days)", points.recent_days));
        } else if days_inactive <= points.lapsing_days {
            score += points.lapsing_activity;
        }

        if profile.weak_areas.len() >= points.weak_area_count {
            score += points.weak_areas;
            triggers.push(format!("Multiple weak areas: {}", profile.weak_areas.len()));
        }

        score.clamp(0.0, self.config.max_sub_score())
    }

    /// Lifetime value potential
    pub fn value(&self, profile: &UserProfile, now: DateTime<Utc>, triggers: &mut Vec<String>) -> f64 {
        let points = &self.config.value;
        let mut score = 0.0;

        if profile.current_level.is_advanced() {
            score += points.advanced_level;
        }

        if profile.current_role.is_paying() {
            score += points.paid_role;
        }

        let days = profile.days_as_user(now);
        if days >= points.long_term_days {
            score += points.long_term;
            triggers.push(format!("Long-term user: {} days", days));
        }

        score.clamp(0.0, self.config.max_sub_score())
    }

    /// Advanced learner (C1/C2) with a chronic pattern in the
    /// potential-lead domain
    pub fn is_potential_lead(&self, profile: &UserProfile, patterns: &[ErrorPattern]) -> bool {
        profile.current_level.is_advanced()
            && self
                .config
                .eligibility
                .potential_lead_pattern(patterns)
                .is_some()
    }

    /// Map the overall score to a status; the potential-lead predicate wins
    pub fn status(&self, score: f64, potential_lead: bool) -> LeadStatus {
        let thresholds = &self.config.status_thresholds;
        if potential_lead {
            LeadStatus::PotentialLead
        } else if score >= thresholds.qualified {
            LeadStatus::QualifiedLead
        } else if score >= thresholds.hot {
            LeadStatus::Hot
        } else if score >= thresholds.warm {
            LeadStatus::Warm
        } else {
            LeadStatus::Cold
        }
    }
}
