//! Integration tests for the lead scoring engine
//!
//! Exercise the full flow (events -> patterns -> lead score -> offers)
//! against the in-memory stores and a fixed clock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;

use fluency_leads_config::{OfferCatalog, ScoringConfig};
use fluency_leads_core::{
    AccountRole, Clock, DiscountTier, Error, ErrorCategory, ErrorEvent, ErrorHistoryStore,
    FixedClock, LeadScoreStore, LeadStatus, Money, OfferStore, OfferType, ProficiencyLevel, SessionSummary,
    UserProfile,
};
use fluency_leads_engine::{LeadAnalysis, LeadScoringEngine};
use fluency_leads_persistence::PersistenceLayer;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
}

struct Harness {
    engine: LeadScoringEngine,
    stores: PersistenceLayer,
    clock: Arc<FixedClock>,
}

fn harness() -> Harness {
    let stores = PersistenceLayer::in_memory();
    let clock = Arc::new(FixedClock::at(now()));
    let engine = LeadScoringEngine::new(
        ScoringConfig::default(),
        OfferCatalog::default(),
        stores.lead_scores.clone(),
        stores.offers.clone(),
        stores.error_history.clone(),
    )
    .with_clock(clock.clone() as Arc<dyn Clock>);

    Harness {
        engine,
        stores,
        clock,
    }
}

fn event(text: &str, domain: &str, session: u32) -> ErrorEvent {
    ErrorEvent::new(
        text,
        ErrorCategory::Vocabulary,
        domain,
        now() - Duration::days(10) + Duration::hours(session as i64),
        format!("session-{}", session),
    )
}

/// Management errors in 5 of 7 sessions (failure rate 0.714)
fn chronic_management_events() -> Vec<ErrorEvent> {
    let mut events: Vec<_> = (1..=5)
        .flat_map(|s| {
            vec![
                event("Used 'make a meeting' instead of 'hold a meeting'", "management", s),
                event("Confused 'delegate' and 'relegate'", "management", s),
            ]
        })
        .collect();
    events.push(event("Wrong preposition in 'deploy on prod'", "technical", 6));
    events.push(event("Mispronounced 'cache'", "technical", 7));
    events
}

fn advanced_student() -> UserProfile {
    UserProfile::new(
        "user-c1",
        ProficiencyLevel::C1,
        AccountRole::Student,
        now() - Duration::days(120),
    )
    .sessions(25)
    .last_active(now() - Duration::days(1))
}

/// Scenario A: C1 student with chronic management failures
#[test]
fn test_potential_lead_gets_flash_sale() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());

    let management = patterns.iter().find(|p| p.domain == "management").unwrap();
    assert_eq!(management.total_sessions, 5);
    assert!((management.failure_rate - 5.0 / 7.0).abs() < 1e-12);

    let (matched, offer) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    assert!(matched);

    let offer = offer.unwrap();
    assert_eq!(offer.offer_type, OfferType::ExecutiveModule);
    assert_eq!(offer.discount_tier, DiscountTier::LimitedTime);
    assert_eq!(offer.discount_percentage(), 40);
    assert_eq!(offer.original_price, Money::from_cents(29900));
    assert_eq!(offer.discount_amount, Money::from_cents(11960));
    assert_eq!(offer.final_price, Money::from_cents(17940));
    assert_eq!(offer.expires_at, now() + Duration::hours(24));

    // The gate scores and stores the profile
    let stored = h.stores.lead_scores.get("user-c1").unwrap().unwrap();
    assert_eq!(stored.lead_status, LeadStatus::PotentialLead);
    assert_eq!(stored.expires_at, now() + Duration::hours(48));
    assert!(stored
        .triggers
        .contains(&"Consistent failures in management: 71.4% error rate".to_string()));
    assert_eq!(h.stores.offers.get(&offer.offer_id).unwrap(), Some(offer));
}

/// Scenario B: a new free learner
#[test]
fn test_new_free_user_is_cold() {
    let h = harness();
    let profile = UserProfile::new(
        "user-b1",
        ProficiencyLevel::B1,
        AccountRole::Free,
        now() - Duration::days(10),
    )
    .sessions(2)
    .last_active(now() - Duration::days(10));
    let events = vec![
        event("Wrong tense in status update", "business", 1),
        event("Missing article", "business", 2),
    ];

    let patterns = h.engine.analyze_error_patterns(&profile.user_id, &events);
    let score = h.engine.calculate_lead_score(&profile, &patterns).unwrap();

    assert_eq!(score.lead_status, LeadStatus::Cold);
    assert!(score.recommended_offers.is_empty());
    assert!(score.triggers.is_empty());

    let (matched, offer) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    assert!(!matched);
    assert!(offer.is_none());
}

/// Scenario C: no events at all
#[test]
fn test_scoring_without_events() {
    let h = harness();
    let profile = UserProfile::new(
        "user-new",
        ProficiencyLevel::B2,
        AccountRole::Free,
        now() - Duration::days(3),
    )
    .last_active(now())
    .weak_areas(["grammar", "listening", "vocabulary"]);

    let patterns = h.engine.analyze_error_patterns(&profile.user_id, &[]);
    assert!(patterns.is_empty());

    let score = h.engine.calculate_lead_score(&profile, &patterns).unwrap();
    assert_eq!(score.urgency_score, 50.0);
    assert_eq!(
        score.triggers,
        vec![
            "Recently active (last 3 days)".to_string(),
            "Multiple weak areas: 3".to_string(),
        ]
    );
    assert!(score.recommended_offers.is_empty());
}

#[test]
fn test_potential_lead_takes_precedence_over_qualified() {
    let h = harness();
    let profile = advanced_student()
        .modules(["onboarding", "standups", "code-review"])
        .weak_areas(["grammar", "idioms", "pronunciation"]);
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());

    let score = h.engine.calculate_lead_score(&profile, &patterns).unwrap();
    assert!(score.score >= 80.0);
    assert_eq!(score.lead_status, LeadStatus::PotentialLead);
}

#[test]
fn test_ranking_top_three_without_duplicates() {
    let h = harness();
    let profile = UserProfile::new(
        "user-multi",
        ProficiencyLevel::B2,
        AccountRole::Student,
        now() - Duration::days(200),
    )
    .sessions(30)
    .last_active(now());

    // Ten sessions; domains appear in 9, 8, 6 and 5 of them
    let mut events = Vec::new();
    for s in 1..=10 {
        if s <= 9 {
            events.push(event("Negotiation slip", "negotiation", s));
        }
        if s <= 8 {
            events.push(event("Leadership vocabulary", "management", s));
        }
        if s <= 6 {
            events.push(event("Report phrasing", "business", s));
        }
        if s <= 5 {
            events.push(event("Docs wording", "technical", s));
        }
    }

    let patterns = h.engine.analyze_error_patterns(&profile.user_id, &events);
    let score = h.engine.calculate_lead_score(&profile, &patterns).unwrap();

    let types: Vec<_> = score.recommended_offers.iter().map(|r| r.offer_type).collect();
    assert_eq!(
        types,
        vec![
            OfferType::NegotiationSkills,
            OfferType::ExecutiveModule,
            OfferType::AdvancedBusiness,
        ]
    );
    assert!(score
        .recommended_offers
        .windows(2)
        .all(|w| w[0].priority > w[1].priority));
}

#[test]
fn test_scoring_is_idempotent_under_fixed_clock() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());

    let first = h.engine.calculate_lead_score(&profile, &patterns).unwrap();
    let second = h.engine.calculate_lead_score(&profile, &patterns).unwrap();

    assert_eq!(first, second);
    assert_eq!(h.stores.lead_scores.list().unwrap().len(), 1);
}

#[test]
fn test_analyze_lead_needs_history() {
    let h = harness();
    let profile = advanced_student();

    for e in chronic_management_events().into_iter().take(3) {
        h.engine.track_error(&profile.user_id, e).unwrap();
    }

    let analysis = h.engine.analyze_lead(&profile).unwrap();
    assert_eq!(
        analysis,
        LeadAnalysis::InsufficientData {
            required: 5,
            current: 3
        }
    );
}

#[test]
fn test_analyze_lead_builds_offer_for_potential_lead() {
    let h = harness();
    let profile = advanced_student();

    let mut count = 0;
    for e in chronic_management_events() {
        count = h.engine.track_error(&profile.user_id, e).unwrap();
    }
    assert_eq!(count, 12);

    let LeadAnalysis::Scored { lead_score, offer } = h.engine.analyze_lead(&profile).unwrap()
    else {
        panic!("expected a scored analysis");
    };
    assert_eq!(lead_score.lead_status, LeadStatus::PotentialLead);

    let offer = offer.unwrap();
    assert_eq!(offer.offer_type, OfferType::ExecutiveModule);
    assert_eq!(offer.discount_tier, DiscountTier::LimitedTime);
    assert_eq!(
        h.engine.active_offer_for(&profile.user_id).unwrap(),
        Some(offer)
    );
}

#[test]
fn test_track_error_rejects_incomplete_events() {
    let h = harness();

    let mut blank = event("", "management", 1);
    assert!(matches!(
        h.engine.track_error("u1", blank.clone()),
        Err(Error::InvalidInput(_))
    ));

    blank.error = "Misused 'stakeholder'".to_string();
    blank.domain = None;
    assert!(matches!(
        h.engine.track_error("u1", blank),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_track_error_stamps_missing_session_and_time() {
    let h = harness();
    let profile = advanced_student();

    for i in 0..6 {
        let bare = ErrorEvent {
            error: format!("Misused 'escalate' in stand-up {}", i),
            category: ErrorCategory::Vocabulary,
            domain: Some("management".to_string()),
            timestamp: None,
            session_id: None,
        };
        h.engine.track_error(&profile.user_id, bare).unwrap();
        h.clock.advance(Duration::hours(1));
    }

    let history = h.stores.error_history.history(&profile.user_id).unwrap();
    assert!(history.iter().all(ErrorEvent::is_analyzable));
    assert_eq!(history[0].timestamp, Some(now()));
    assert_eq!(
        history[0].session_id,
        Some(format!("session-{}", now().timestamp_millis()))
    );

    let LeadAnalysis::Scored { lead_score, offer } = h.engine.analyze_lead(&profile).unwrap()
    else {
        panic!("expected a scored analysis");
    };
    assert_eq!(lead_score.lead_status, LeadStatus::PotentialLead);
    assert!(lead_score
        .triggers
        .contains(&"Consistent failures in management: 100.0% error rate".to_string()));
    assert!(offer.is_some());
}

#[test]
fn test_track_error_keeps_caller_session() {
    let h = harness();
    let tracked = event("Confused 'delegate' and 'relegate'", "management", 3);
    h.engine.track_error("u1", tracked.clone()).unwrap();

    assert_eq!(h.stores.error_history.history("u1").unwrap(), vec![tracked]);
}

#[test]
fn test_active_offer_is_newest_of_same_instant_offers() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());

    let mut newest = None;
    for _ in 0..12 {
        let (_, offer) = h
            .engine
            .check_potential_lead_criteria(&profile, &patterns)
            .unwrap();
        newest = offer;
    }

    let newest = newest.unwrap();
    assert_eq!(newest.sequence, 12);
    assert_eq!(
        h.engine.active_offer_for(&profile.user_id).unwrap(),
        Some(newest)
    );
}

#[test]
fn test_offer_accepted_at_most_once_under_contention() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());
    let (_, offer) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    let offer = offer.unwrap();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| h.engine.accept_offer(&profile.user_id, &offer.offer_id)))
            .collect();
        handles.into_iter().map(|t| t.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, Error::OfferNotFound(_))));
    assert!(h.stores.offers.is_empty());
}

#[test]
fn test_rejected_accept_leaves_offer_in_place() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());
    let (_, offer) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    let offer = offer.unwrap();

    assert!(matches!(
        h.engine.accept_offer("intruder", &offer.offer_id),
        Err(Error::OfferNotFound(_))
    ));
    assert_eq!(h.stores.offers.get(&offer.offer_id).unwrap(), Some(offer.clone()));

    h.clock.advance(Duration::hours(25));
    assert!(matches!(
        h.engine.accept_offer(&profile.user_id, &offer.offer_id),
        Err(Error::OfferExpired { .. })
    ));
    assert_eq!(h.stores.offers.get(&offer.offer_id).unwrap(), Some(offer));
}

#[test]
fn test_offer_acceptance_and_expiry() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());

    let (_, first) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    let first = first.unwrap();

    // Someone else's offer id is not found
    assert!(matches!(
        h.engine.accept_offer("intruder", &first.offer_id),
        Err(Error::OfferNotFound(_))
    ));

    let accepted = h.engine.accept_offer(&profile.user_id, &first.offer_id).unwrap();
    assert!(accepted.order_id.starts_with("ORDER-"));
    assert_eq!(accepted.amount, Money::from_cents(17940));
    assert_eq!(accepted.module_name, "Executive IT English Module");
    assert!(matches!(
        h.engine.accept_offer(&profile.user_id, &first.offer_id),
        Err(Error::OfferNotFound(_))
    ));

    // A second offer lapses after 24h
    let (_, second) = h
        .engine
        .check_potential_lead_criteria(&profile, &patterns)
        .unwrap();
    let second = second.unwrap();
    assert_ne!(second.offer_id, first.offer_id);

    h.clock.advance(Duration::hours(24));
    assert!(h.engine.active_offer_for(&profile.user_id).unwrap().is_some());

    h.clock.advance(Duration::seconds(1));
    assert!(h.engine.active_offer_for(&profile.user_id).unwrap().is_none());
    assert!(matches!(
        h.engine.accept_offer(&profile.user_id, &second.offer_id),
        Err(Error::OfferExpired { .. })
    ));
}

#[test]
fn test_create_offer_for_mismatched_score_rejected() {
    let h = harness();
    let profile = advanced_student();
    let patterns = h
        .engine
        .analyze_error_patterns(&profile.user_id, &chronic_management_events());
    let score = h.engine.calculate_lead_score(&profile, &patterns).unwrap();
    let recommendation = score.top_recommendation().unwrap().clone();

    let other = UserProfile::new("someone-else", ProficiencyLevel::C1, AccountRole::Free, now());
    assert!(matches!(
        h.engine.create_dynamic_offer(&other, &score, &recommendation),
        Err(Error::InvalidInput(_))
    ));

    let offer = h
        .engine
        .create_dynamic_offer(&profile, &score, &recommendation)
        .unwrap();
    assert_eq!(offer.user_id, "user-c1");
}

#[test]
fn test_conversion_candidate_through_engine() {
    let h = harness();
    let profile = UserProfile::new(
        "user-free",
        ProficiencyLevel::B2,
        AccountRole::Free,
        now() - Duration::days(20),
    );
    let sessions: Vec<_> = (1..=3)
        .map(|i| SessionSummary {
            session_id: format!("s{}", i),
            started_at: now() - Duration::days(i),
            confidence_score: 9.0,
            error_count: 2,
        })
        .collect();

    let candidate = h
        .engine
        .detect_conversion_candidate(&profile, &sessions)
        .unwrap();
    assert_eq!(candidate.consecutive_high_scores, 3);
    assert_eq!(candidate.total_errors, 6);

    let json = serde_json::to_value(&candidate).unwrap();
    assert_eq!(json["recommendation"], "SEND_EXECUTIVE_OFFER");
}
