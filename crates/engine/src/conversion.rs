//! Free-to-paid conversion detection
//!
//! A free user becomes a conversion candidate after a run of consecutive
//! high-confidence coaching sessions among their most recent ones.

use chrono::{DateTime, Duration, Utc};

use fluency_leads_config::ConversionThresholds;
use fluency_leads_core::{
    AccountRole, ConversionAction, ConversionCandidate, SessionSummary, UserProfile,
};

#[derive(Debug, Clone)]
pub struct ConversionDetector {
    thresholds: ConversionThresholds,
}

impl ConversionDetector {
    pub fn new(thresholds: ConversionThresholds) -> Self {
        Self { thresholds }
    }

    /// Check one user's sessions at `now`
    ///
    /// Only sessions inside the lookback window count. The most recent
    /// `recent_session_window` of those are inspected newest first.
    pub fn detect(
        &self,
        profile: &UserProfile,
        sessions: &[SessionSummary],
        now: DateTime<Utc>,
    ) -> Option<ConversionCandidate> {
        if profile.current_role != AccountRole::Free {
            return None;
        }

        let since = now - Duration::days(self.thresholds.lookback_days);
        let mut recent: Vec<&SessionSummary> =
            sessions.iter().filter(|s| s.started_at >= since).collect();
        recent.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        recent.truncate(self.thresholds.recent_session_window);

        let last_session_at = recent.first()?.started_at;

        let mut run = 0u32;
        let mut longest = 0u32;
        for session in &recent {
            if session.confidence_score >= self.thresholds.min_confidence_score {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 0;
            }
        }

        if longest < self.thresholds.min_consecutive_sessions {
            return None;
        }

        let scores: Vec<f64> = recent.iter().map(|s| s.confidence_score).collect();
        let avg = scores.iter().sum::<f64>() / scores.len() as f64;
        let max = scores.iter().copied().fold(f64::MIN, f64::max);
        let total_errors = recent.iter().map(|s| s.error_count).sum();

        tracing::info!(
            user_id = %profile.user_id,
            consecutive = longest,
            avg_confidence = avg,
            "Conversion candidate detected"
        );

        Some(ConversionCandidate {
            user_id: profile.user_id.clone(),
            english_level: profile.current_level,
            consecutive_high_scores: longest,
            recent_sessions_count: recent.len() as u32,
            avg_confidence_score: (avg * 100.0).round() / 100.0,
            max_confidence_score: max,
            total_errors,
            confidence_scores: scores.into_iter().take(longest as usize).collect(),
            last_session_at,
            recommendation: ConversionAction::SendExecutiveOffer,
        })
    }
}

impl Default for ConversionDetector {
    fn default() -> Self {
        Self::new(ConversionThresholds::default())
    }
}
