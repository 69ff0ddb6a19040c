//! Raw error events and derived per-domain error patterns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain tag used when an event carries none
pub const DEFAULT_DOMAIN: &str = "general";

/// Category of a learner error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Grammar,
    Pronunciation,
    Vocabulary,
    Spelling,
    #[default]
    #[serde(other)]
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grammar => "grammar",
            Self::Pronunciation => "pronunciation",
            Self::Vocabulary => "vocabulary",
            Self::Spelling => "spelling",
            Self::Other => "other",
        }
    }
}

/// One error detected during a coaching session
///
/// Events arrive from the session-logging subsystem and may be incomplete.
/// Session id and timestamp are required for analysis; events lacking either
/// are skipped by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Human-readable description of the mistake
    pub error: String,

    #[serde(default)]
    pub category: ErrorCategory,

    /// Topical domain tag (e.g. "management", "technical")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ErrorEvent {
    /// Create a complete event
    pub fn new(
        error: impl Into<String>,
        category: ErrorCategory,
        domain: impl Into<String>,
        timestamp: DateTime<Utc>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            category,
            domain: Some(domain.into()),
            timestamp: Some(timestamp),
            session_id: Some(session_id.into()),
        }
    }

    /// Domain tag, falling back to [`DEFAULT_DOMAIN`]
    pub fn domain_or_default(&self) -> &str {
        match self.domain.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => DEFAULT_DOMAIN,
        }
    }

    /// Timestamp and session id, if both are present and the id is not blank
    pub fn session_stamp(&self) -> Option<(DateTime<Utc>, &str)> {
        let timestamp = self.timestamp?;
        let session_id = self.session_id.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((timestamp, session_id))
    }

    /// Whether the event has everything the analyzer needs
    pub fn is_analyzable(&self) -> bool {
        self.session_stamp().is_some()
    }
}

/// Failure statistics for one domain over an analysis window
///
/// A view over error events, recomputed on every analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPattern {
    pub domain: String,

    /// Number of errors in this domain
    pub error_count: u32,

    /// Distinct sessions with at least one error in this domain
    pub total_sessions: u32,

    /// Share of the window's sessions that contain an error in this domain (0.0-1.0)
    pub failure_rate: f64,

    /// Up to five most recent error descriptions, newest first
    pub recent_errors: Vec<String>,

    pub first_detected: DateTime<Utc>,
    pub last_detected: DateTime<Utc>,
}

impl ErrorPattern {
    /// Whether the domain tag matches, ignoring ASCII case
    pub fn is_domain(&self, domain: &str) -> bool {
        self.domain.eq_ignore_ascii_case(domain)
    }

    /// Failure rate as a percentage with one decimal, as shown in triggers
    pub fn failure_percentage(&self) -> String {
        format!("{:.1}", self.failure_rate * 100.0)
    }
}
