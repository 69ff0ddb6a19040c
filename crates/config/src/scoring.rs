//! Lead Scoring Configuration
//!
//! Defines the rule table for readiness, urgency and value sub-scores, the
//! weights that combine them, status thresholds and offer ranking. Defaults
//! reproduce the production rule set; a scoring.yaml may override any part.

use serde::{Deserialize, Serialize};
use std::path::Path;

use fluency_leads_core::ErrorPattern;

use crate::constants;
use crate::ConfigError;

/// Scoring configuration loaded from scoring.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    /// Which error patterns count as chronic
    #[serde(default)]
    pub eligibility: EligibilityConfig,
    #[serde(default)]
    pub readiness: ReadinessPoints,
    #[serde(default)]
    pub urgency: UrgencyPoints,
    #[serde(default)]
    pub value: ValuePoints,
    /// Weights combining the sub-scores
    #[serde(default)]
    pub weights: SubScoreWeights,
    #[serde(default)]
    pub status_thresholds: StatusThresholds,
    #[serde(default)]
    pub offers: OfferRankingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub conversion: ConversionThresholds,
}

impl ScoringConfig {
    /// Load from a YAML file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config: ScoringConfig = crate::read_yaml(path.as_ref())?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded scoring config");
        Ok(config)
    }

    /// Parse from a YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate ranges and cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("eligibility.failure_rate_threshold", self.eligibility.failure_rate_threshold)?;
        unit_interval("offers.limited_time_failure_rate", self.offers.limited_time_failure_rate)?;

        if self.eligibility.domain.trim().is_empty() {
            return Err(ConfigError::MissingField(
                "eligibility.potential_lead_domain".to_string(),
            ));
        }

        self.readiness.validate()?;
        self.urgency.validate()?;
        self.value.validate()?;
        self.weights.validate()?;
        self.status_thresholds.validate()?;

        if self.max_sub_score() <= 0.0 {
            return Err(ConfigError::invalid("max_sub_score", "Must be positive"));
        }

        if self.offers.max_recommendations == 0 {
            return Err(ConfigError::invalid(
                "offers.max_recommendations",
                "At least one recommendation must be allowed",
            ));
        }

        if self.analysis.recent_errors_limit == 0 {
            return Err(ConfigError::invalid(
                "analysis.recent_errors_limit",
                "Must keep at least one recent error",
            ));
        }

        if self.analysis.lead_score_ttl_hours <= 0 {
            return Err(ConfigError::invalid(
                "analysis.lead_score_ttl_hours",
                format!("Must be positive, got {}", self.analysis.lead_score_ttl_hours),
            ));
        }

        if !(0.0..=10.0).contains(&self.conversion.min_confidence_score) {
            return Err(ConfigError::invalid(
                "conversion.min_confidence_score",
                format!(
                    "Must be between 0.0 and 10.0, got {}",
                    self.conversion.min_confidence_score
                ),
            ));
        }

        if self.conversion.recent_session_window < self.conversion.min_consecutive_sessions as usize {
            return Err(ConfigError::invalid(
                "conversion.recent_session_window",
                "Window is shorter than the required consecutive run",
            ));
        }

        if self.conversion.lookback_days <= 0 {
            return Err(ConfigError::invalid(
                "conversion.lookback_days",
                format!("Must be positive, got {}", self.conversion.lookback_days),
            ));
        }

        Ok(())
    }

    /// Cap applied to every sub-score
    pub fn max_sub_score(&self) -> f64 {
        constants::MAX_SUB_SCORE
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(
            field,
            format!("Must be between 0.0 and 1.0, got {}", value),
        ));
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("Points must not be negative, got {}", value),
        ));
    }
    Ok(())
}

/// Pattern eligibility rule shared by urgency, recommendations and the
/// potential-lead gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    pub failure_rate_threshold: f64,
    pub min_sessions: u32,
    /// Domain whose chronic failures mark advanced learners as potential leads
    #[serde(rename = "potential_lead_domain")]
    pub domain: String,
}

impl EligibilityConfig {
    /// Whether a pattern is chronic enough to drive urgency and offers
    pub fn is_eligible(&self, pattern: &ErrorPattern) -> bool {
        pattern.failure_rate >= self.failure_rate_threshold
            && pattern.total_sessions >= self.min_sessions
    }

    /// Eligible pattern for the potential-lead domain, if any
    pub fn potential_lead_pattern<'a>(&self, patterns: &'a [ErrorPattern]) -> Option<&'a ErrorPattern> {
        patterns
            .iter()
            .find(|p| p.is_domain(&self.domain) && self.is_eligible(p))
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: constants::eligibility::FAILURE_RATE_THRESHOLD,
            min_sessions: constants::eligibility::MIN_SESSIONS_FOR_PATTERN,
            domain: constants::eligibility::POTENTIAL_LEAD_DOMAIN.to_string(),
        }
    }
}

/// Readiness points (likelihood to convert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessPoints {
    /// C1/C2 learners
    pub advanced_level: f64,
    /// B2 learners
    pub upper_intermediate_level: f64,
    /// Everyone else
    pub base_level: f64,
    pub high_engagement_sessions: u32,
    pub high_engagement: f64,
    pub moderate_engagement_sessions: u32,
    pub moderate_engagement: f64,
    /// Student or coach accounts
    pub paid_role: f64,
    pub committed_modules: usize,
    pub committed: f64,
}

impl Default for ReadinessPoints {
    fn default() -> Self {
        Self {
            advanced_level: 40.0,
            upper_intermediate_level: 25.0,
            base_level: 10.0,
            high_engagement_sessions: 20,
            high_engagement: 20.0,
            moderate_engagement_sessions: 10,
            moderate_engagement: 10.0,
            paid_role: 20.0,
            committed_modules: 3,
            committed: 20.0,
        }
    }
}

impl ReadinessPoints {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("readiness.advanced_level", self.advanced_level)?;
        non_negative("readiness.upper_intermediate_level", self.upper_intermediate_level)?;
        non_negative("readiness.base_level", self.base_level)?;
        non_negative("readiness.high_engagement", self.high_engagement)?;
        non_negative("readiness.moderate_engagement", self.moderate_engagement)?;
        non_negative("readiness.paid_role", self.paid_role)?;
        non_negative("readiness.committed", self.committed)
    }
}

/// Urgency points (time sensitivity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgencyPoints {
    /// Added once per chronic domain
    pub per_chronic_domain: f64,
    pub recent_days: i64,
    pub recent_activity: f64,
    pub lapsing_days: i64,
    pub lapsing_activity: f64,
    pub weak_area_count: usize,
    pub weak_areas: f64,
}

impl Default for UrgencyPoints {
    fn default() -> Self {
        Self {
            per_chronic_domain: 30.0,
            recent_days: 3,
            recent_activity: 30.0,
            lapsing_days: 7,
            lapsing_activity: 15.0,
            weak_area_count: 3,
            weak_areas: 20.0,
        }
    }
}

impl UrgencyPoints {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("urgency.per_chronic_domain", self.per_chronic_domain)?;
        non_negative("urgency.recent_activity", self.recent_activity)?;
        non_negative("urgency.lapsing_activity", self.lapsing_activity)?;
        non_negative("urgency.weak_areas", self.weak_areas)
    }
}

/// Value points (lifetime value proxy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoints {
    pub advanced_level: f64,
    pub paid_role: f64,
    pub long_term_days: i64,
    pub long_term: f64,
}

impl Default for ValuePoints {
    fn default() -> Self {
        Self {
            advanced_level: 40.0,
            paid_role: 30.0,
            long_term_days: 90,
            long_term: 30.0,
        }
    }
}

impl ValuePoints {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("value.advanced_level", self.advanced_level)?;
        non_negative("value.paid_role", self.paid_role)?;
        non_negative("value.long_term", self.long_term)
    }
}

/// Weights for the overall score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScoreWeights {
    pub readiness: f64,
    pub urgency: f64,
    pub value: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            readiness: constants::weights::READINESS,
            urgency: constants::weights::URGENCY,
            value: constants::weights::VALUE,
        }
    }
}

impl SubScoreWeights {
    /// Weights must each be in [0, 1] and sum to 1 so the overall score
    /// stays within the sub-score range
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("weights.readiness", self.readiness)?;
        unit_interval("weights.urgency", self.urgency)?;
        unit_interval("weights.value", self.value)?;

        let sum = self.readiness + self.urgency + self.value;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::invalid(
                "weights",
                format!("Weights must sum to 1.0, got {:.4}", sum),
            ));
        }
        Ok(())
    }

    pub fn combine(&self, readiness: f64, urgency: f64, value: f64) -> f64 {
        readiness * self.readiness + urgency * self.urgency + value * self.value
    }
}

/// Minimum overall score per status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub qualified: f64,
    pub hot: f64,
    pub warm: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            qualified: constants::status::QUALIFIED,
            hot: constants::status::HOT,
            warm: constants::status::WARM,
        }
    }
}

impl StatusThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.warm <= self.hot && self.hot <= self.qualified) {
            return Err(ConfigError::invalid(
                "status_thresholds",
                format!(
                    "Thresholds must be ordered warm <= hot <= qualified, got {} / {} / {}",
                    self.warm, self.hot, self.qualified
                ),
            ));
        }
        if self.warm < 0.0 || self.qualified > constants::MAX_SUB_SCORE {
            return Err(ConfigError::invalid(
                "status_thresholds",
                "Thresholds must lie within 0-100",
            ));
        }
        Ok(())
    }
}

/// Offer ranking and tiering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRankingConfig {
    pub failure_rate_weight: f64,
    pub score_weight: f64,
    pub max_recommendations: usize,
    pub limited_time_failure_rate: f64,
    pub potential_lead_priority: f64,
}

impl Default for OfferRankingConfig {
    fn default() -> Self {
        Self {
            failure_rate_weight: constants::offers::FAILURE_RATE_WEIGHT,
            score_weight: constants::offers::SCORE_WEIGHT,
            max_recommendations: constants::offers::MAX_RECOMMENDATIONS,
            limited_time_failure_rate: constants::offers::LIMITED_TIME_FAILURE_RATE,
            potential_lead_priority: constants::offers::POTENTIAL_LEAD_PRIORITY,
        }
    }
}

/// Error analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub recent_errors_limit: usize,
    pub min_errors_for_analysis: usize,
    pub lead_score_ttl_hours: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_errors_limit: constants::analysis::RECENT_ERRORS_LIMIT,
            min_errors_for_analysis: constants::analysis::MIN_ERRORS_FOR_ANALYSIS,
            lead_score_ttl_hours: constants::LEAD_SCORE_TTL_HOURS,
        }
    }
}

/// Free-to-paid conversion detection thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionThresholds {
    pub min_consecutive_sessions: u32,
    pub min_confidence_score: f64,
    pub recent_session_window: usize,
    pub lookback_days: i64,
}

impl Default for ConversionThresholds {
    fn default() -> Self {
        Self {
            min_consecutive_sessions: constants::conversion::MIN_CONSECUTIVE_SESSIONS,
            min_confidence_score: constants::conversion::MIN_CONFIDENCE_SCORE,
            recent_session_window: constants::conversion::RECENT_SESSION_WINDOW,
            lookback_days: constants::conversion::LOOKBACK_DAYS,
        }
    }
}
