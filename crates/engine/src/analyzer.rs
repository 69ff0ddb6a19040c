//! Error pattern analysis
//!
//! Groups a user's error events by domain and computes per-domain failure
//! statistics over the analysis window.
//!
//! The window is the set of distinct sessions across all accepted events. A
//! domain's failure rate is the share of those sessions with at least one
//! error in the domain, so it always lies in [0, 1].

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use fluency_leads_config::AnalysisConfig;
use fluency_leads_core::{ErrorEvent, ErrorPattern};

/// Per-domain accumulator
struct DomainStats<'a> {
    domain: String,
    error_count: u32,
    sessions: HashSet<&'a str>,
    /// (timestamp, input index, description)
    errors: Vec<(DateTime<Utc>, usize, &'a str)>,
    first_detected: DateTime<Utc>,
    last_detected: DateTime<Utc>,
}

/// Computes [`ErrorPattern`]s from raw events
#[derive(Debug, Clone)]
pub struct ErrorPatternAnalyzer {
    recent_errors_limit: usize,
}

impl ErrorPatternAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            recent_errors_limit: config.recent_errors_limit,
        }
    }

    /// Analyze events for one user
    ///
    /// Returns one pattern per domain in first-seen order. Domains are
    /// compared after trimming and lowercasing. Events without a session id
    /// or timestamp are skipped.
    pub fn analyze(&self, user_id: &str, events: &[ErrorEvent]) -> Vec<ErrorPattern> {
        let mut order: Vec<DomainStats<'_>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut window: HashSet<&str> = HashSet::new();
        let mut skipped = 0usize;

        for (position, event) in events.iter().enumerate() {
            let Some((timestamp, session_id)) = event.session_stamp() else {
                skipped += 1;
                continue;
            };

            window.insert(session_id);

            let domain = event.domain_or_default().trim().to_lowercase();
            let slot = match index.get(&domain) {
                Some(&slot) => slot,
                None => {
                    index.insert(domain.clone(), order.len());
                    order.push(DomainStats {
                        domain,
                        error_count: 0,
                        sessions: HashSet::new(),
                        errors: Vec::new(),
                        first_detected: timestamp,
                        last_detected: timestamp,
                    });
                    order.len() - 1
                }
            };

            let stats = &mut order[slot];
            stats.error_count += 1;
            stats.sessions.insert(session_id);
            stats.errors.push((timestamp, position, event.error.as_str()));
            stats.first_detected = stats.first_detected.min(timestamp);
            stats.last_detected = stats.last_detected.max(timestamp);
        }

        if skipped > 0 {
            tracing::warn!(
                user_id = %user_id,
                skipped,
                "Skipped error events without session id or timestamp"
            );
        }

        let window_sessions = window.len();

        order
            .into_iter()
            .map(|mut stats| {
                let total_sessions = stats.sessions.len() as u32;
                let failure_rate = if window_sessions == 0 {
                    0.0
                } else {
                    (total_sessions as f64 / window_sessions as f64).min(1.0)
                };

                // Newest first; stable sort keeps input order on equal timestamps
                stats.errors.sort_by(|a, b| b.0.cmp(&a.0));
                let recent_errors = stats
                    .errors
                    .iter()
                    .take(self.recent_errors_limit)
                    .map(|(_, _, text)| text.to_string())
                    .collect();

                let pattern = ErrorPattern {
                    domain: stats.domain,
                    error_count: stats.error_count,
                    total_sessions,
                    failure_rate,
                    recent_errors,
                    first_detected: stats.first_detected,
                    last_detected: stats.last_detected,
                };

                tracing::debug!(
                    user_id = %user_id,
                    domain = %pattern.domain,
                    errors = pattern.error_count,
                    sessions = pattern.total_sessions,
                    failure_rate = pattern.failure_rate,
                    "Computed error pattern"
                );

                pattern
            })
            .collect()
    }
}

impl Default for ErrorPatternAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
