//! Property tests for scoring invariants

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use fluency_leads_config::{OfferCatalog, ScoringConfig};
use fluency_leads_core::{
    AccountRole, ErrorCategory, ErrorEvent, LeadStatus, ProficiencyLevel, UserProfile,
};
use fluency_leads_engine::{ErrorPatternAnalyzer, LeadClassifier, OfferRecommender};

const DOMAINS: [&str; 6] = ["management", "business", "technical", "negotiation", "general", "Management"];

const LEVELS: [ProficiencyLevel; 6] = [
    ProficiencyLevel::A1,
    ProficiencyLevel::A2,
    ProficiencyLevel::B1,
    ProficiencyLevel::B2,
    ProficiencyLevel::C1,
    ProficiencyLevel::C2,
];

const ROLES: [AccountRole; 4] = [
    AccountRole::Free,
    AccountRole::Student,
    AccountRole::Coach,
    AccountRole::Superuser,
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
}

fn arb_event() -> impl Strategy<Value = ErrorEvent> {
    (0..DOMAINS.len(), 0u32..12, 0i64..5000, any::<bool>(), any::<bool>()).prop_map(
        |(domain, session, minutes, has_session, has_time)| ErrorEvent {
            error: format!("error in session {}", session),
            category: ErrorCategory::Grammar,
            domain: Some(DOMAINS[domain].to_string()),
            timestamp: has_time.then(|| now() - Duration::minutes(minutes)),
            session_id: has_session.then(|| format!("s{}", session)),
        },
    )
}

fn arb_profile() -> impl Strategy<Value = UserProfile> {
    (
        0..LEVELS.len(),
        0..ROLES.len(),
        0u32..60,
        0i64..400,
        0i64..30,
        0usize..6,
        0usize..6,
    )
        .prop_map(|(level, role, sessions, age, inactive, weak, modules)| {
            UserProfile::new(
                "prop-user",
                LEVELS[level],
                ROLES[role],
                now() - Duration::days(age),
            )
            .sessions(sessions)
            .last_active(now() - Duration::days(inactive.min(age)))
            .weak_areas((0..weak).map(|i| format!("weak-{}", i)))
            .modules((0..modules).map(|i| format!("module-{}", i)))
        })
}

proptest! {
    #[test]
    fn failure_rate_is_a_fraction(events in prop::collection::vec(arb_event(), 0..80)) {
        let patterns = ErrorPatternAnalyzer::default().analyze("prop-user", &events);
        for pattern in &patterns {
            prop_assert!((0.0..=1.0).contains(&pattern.failure_rate));
            prop_assert!(pattern.total_sessions as usize <= pattern.error_count as usize);
            prop_assert!(pattern.recent_errors.len() <= 5);
            prop_assert!(pattern.first_detected <= pattern.last_detected);
        }
    }

    #[test]
    fn scores_stay_in_range(
        profile in arb_profile(),
        events in prop::collection::vec(arb_event(), 0..80),
    ) {
        let config = ScoringConfig::default();
        let catalog = OfferCatalog::default();
        let patterns = ErrorPatternAnalyzer::default().analyze("prop-user", &events);
        let result = LeadClassifier::new(&config).classify(&profile, &patterns, now());

        for sub in [result.readiness_score, result.urgency_score, result.value_score] {
            prop_assert!((0.0..=100.0).contains(&sub));
        }
        let expected = 0.35 * result.readiness_score
            + 0.40 * result.urgency_score
            + 0.25 * result.value_score;
        prop_assert!((result.score - expected).abs() < 1e-9);

        let recs = OfferRecommender::new(&config, &catalog).recommend(&patterns, result.status, result.score);
        prop_assert!(recs.len() <= 3);
        prop_assert!(recs.windows(2).all(|w| w[0].priority >= w[1].priority));

        if result.status == LeadStatus::PotentialLead {
            prop_assert!(profile.current_level.is_advanced());
        }
    }
}
