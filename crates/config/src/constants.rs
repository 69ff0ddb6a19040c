//! Centralized defaults for scoring and offer generation
//!
//! Single source of truth for the rule table defaults. Config files override
//! them; nothing else should hardcode these numbers.

/// Pattern eligibility (urgency bonus, recommendations, potential-lead gate)
pub mod eligibility {
    /// Minimum failure rate for a domain to count as chronic
    pub const FAILURE_RATE_THRESHOLD: f64 = 0.40;

    /// Minimum distinct sessions with errors in the domain
    pub const MIN_SESSIONS_FOR_PATTERN: u32 = 5;

    /// Domain that drives the potential-lead rule
    pub const POTENTIAL_LEAD_DOMAIN: &str = "management";
}

/// Sub-score weights; must sum to 1.0
pub mod weights {
    pub const READINESS: f64 = 0.35;
    pub const URGENCY: f64 = 0.40;
    pub const VALUE: f64 = 0.25;
}

/// Cap applied to each sub-score
pub const MAX_SUB_SCORE: f64 = 100.0;

/// Lead status thresholds on the overall score
pub mod status {
    pub const QUALIFIED: f64 = 80.0;
    pub const HOT: f64 = 60.0;
    pub const WARM: f64 = 40.0;
}

/// Offer ranking
pub mod offers {
    /// Priority = failure_rate * FAILURE_RATE_WEIGHT + score * SCORE_WEIGHT
    pub const FAILURE_RATE_WEIGHT: f64 = 60.0;
    pub const SCORE_WEIGHT: f64 = 0.4;

    pub const MAX_RECOMMENDATIONS: usize = 3;

    /// Failure rate at which top-tier leads get the limited-time tier
    pub const LIMITED_TIME_FAILURE_RATE: f64 = 0.60;

    /// Priority given to the forced potential-lead recommendation
    pub const POTENTIAL_LEAD_PRIORITY: f64 = 100.0;
}

/// Hours a lead score stays fresh
pub const LEAD_SCORE_TTL_HOURS: i64 = 48;

/// Error analysis
pub mod analysis {
    /// Recent error descriptions kept per pattern
    pub const RECENT_ERRORS_LIMIT: usize = 5;

    /// Stored errors required before a lead analysis runs
    pub const MIN_ERRORS_FOR_ANALYSIS: usize = 5;
}

/// Free-to-paid conversion detection
pub mod conversion {
    /// Consecutive high-confidence sessions required
    pub const MIN_CONSECUTIVE_SESSIONS: u32 = 3;

    /// Confidence score (0-10) that counts as high
    pub const MIN_CONFIDENCE_SCORE: f64 = 8.0;

    /// Most recent sessions inspected per user
    pub const RECENT_SESSION_WINDOW: usize = 5;

    /// Sessions older than this are ignored
    pub const LOOKBACK_DAYS: i64 = 14;
}
