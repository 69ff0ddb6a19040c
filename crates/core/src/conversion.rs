//! Coaching session summaries and conversion candidates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::ProficiencyLevel;

/// Summary of one finished coaching session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,

    /// Self-reported confidence (0-10)
    pub confidence_score: f64,

    #[serde(default)]
    pub error_count: u32,
}

/// Follow-up action for a conversion candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionAction {
    SendExecutiveOffer,
}

/// Free user whose recent sessions show sustained high confidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionCandidate {
    pub user_id: String,
    pub english_level: ProficiencyLevel,

    /// Longest run of consecutive high-confidence sessions
    pub consecutive_high_scores: u32,

    /// Number of sessions inspected
    pub recent_sessions_count: u32,

    /// Rounded to two decimals
    pub avg_confidence_score: f64,
    pub max_confidence_score: f64,
    pub total_errors: u32,

    /// Scores of the inspected sessions that made up the run, newest first
    pub confidence_scores: Vec<f64>,

    pub last_session_at: DateTime<Utc>,
    pub recommendation: ConversionAction,
}
