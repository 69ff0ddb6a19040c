//! Lead scoring engine
//!
//! Wires the analyzer, classifier, recommender and offer builder to the
//! injected stores and clock. Time is only ever read from the clock, so
//! results are reproducible under a fixed clock.

use serde::Serialize;
use std::sync::Arc;

use fluency_leads_config::{OfferCatalog, ScoringConfig};
use fluency_leads_core::{
    Clock, ConversionCandidate, DynamicOffer, Error, ErrorEvent, ErrorHistoryStore, ErrorPattern,
    LeadScore, LeadScoreStore, LeadStatus, OfferAcceptance, OfferRecommendation, OfferStore,
    Result, SessionSummary, SystemClock, UserProfile,
};

use crate::analyzer::ErrorPatternAnalyzer;
use crate::classifier::LeadClassifier;
use crate::conversion::ConversionDetector;
use crate::offer_builder::OfferBuilder;
use crate::potential_lead::PotentialLeadGate;
use crate::recommender::OfferRecommender;

/// Outcome of [`LeadScoringEngine::analyze_lead`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LeadAnalysis {
    /// Not enough stored errors to score the user yet
    InsufficientData { required: usize, current: usize },
    Scored {
        lead_score: LeadScore,
        offer: Option<DynamicOffer>,
    },
}

pub struct LeadScoringEngine {
    config: ScoringConfig,
    analyzer: ErrorPatternAnalyzer,
    conversion: ConversionDetector,
    offers: OfferBuilder,
    lead_score_store: Arc<dyn LeadScoreStore>,
    offer_store: Arc<dyn OfferStore>,
    error_history: Arc<dyn ErrorHistoryStore>,
    clock: Arc<dyn Clock>,
}

impl LeadScoringEngine {
    /// Create an engine reading the system clock
    pub fn new(
        config: ScoringConfig,
        catalog: OfferCatalog,
        lead_score_store: Arc<dyn LeadScoreStore>,
        offer_store: Arc<dyn OfferStore>,
        error_history: Arc<dyn ErrorHistoryStore>,
    ) -> Self {
        Self {
            analyzer: ErrorPatternAnalyzer::new(&config.analysis),
            conversion: ConversionDetector::new(config.conversion.clone()),
            offers: OfferBuilder::new(catalog),
            config,
            lead_score_store,
            offer_store,
            error_history,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn catalog(&self) -> &OfferCatalog {
        self.offers.catalog()
    }

    /// Group a user's error events into per-domain patterns
    pub fn analyze_error_patterns(&self, user_id: &str, events: &[ErrorEvent]) -> Vec<ErrorPattern> {
        self.analyzer.analyze(user_id, events)
    }

    /// Score a profile, attach recommendations and store the result
    pub fn calculate_lead_score(
        &self,
        profile: &UserProfile,
        patterns: &[ErrorPattern],
    ) -> Result<LeadScore> {
        let now = self.clock.now();
        let classification = LeadClassifier::new(&self.config).classify(profile, patterns, now);

        let recommended_offers = OfferRecommender::new(&self.config, self.catalog()).recommend(
            patterns,
            classification.status,
            classification.score,
        );

        let lead_score = LeadScore {
            user_id: profile.user_id.clone(),
            lead_status: classification.status,
            score: classification.score,
            readiness_score: classification.readiness_score,
            urgency_score: classification.urgency_score,
            value_score: classification.value_score,
            triggers: classification.triggers,
            recommended_offers,
            created_at: now,
            expires_at: now + chrono::Duration::hours(self.config.analysis.lead_score_ttl_hours),
        };

        tracing::debug!(
            user_id = %lead_score.user_id,
            status = %lead_score.lead_status,
            score = lead_score.score,
            readiness = lead_score.readiness_score,
            urgency = lead_score.urgency_score,
            value = lead_score.value_score,
            recommendations = lead_score.recommended_offers.len(),
            "Calculated lead score"
        );
        metrics::counter!("leads_scored_total", "status" => lead_score.lead_status.as_str())
            .increment(1);

        self.lead_score_store.put(lead_score.clone())?;
        Ok(lead_score)
    }

    /// Most recently stored score for a user, unless it has expired
    pub fn stored_lead_score(&self, user_id: &str) -> Result<Option<LeadScore>> {
        let now = self.clock.now();
        Ok(self
            .lead_score_store
            .get(user_id)?
            .filter(|score| !score.is_expired(now)))
    }

    /// Price a recommendation into an offer and store it
    pub fn create_dynamic_offer(
        &self,
        profile: &UserProfile,
        lead_score: &LeadScore,
        recommendation: &OfferRecommendation,
    ) -> Result<DynamicOffer> {
        if lead_score.user_id != profile.user_id {
            return Err(Error::InvalidInput(format!(
                "Lead score belongs to {}, not {}",
                lead_score.user_id, profile.user_id
            )));
        }

        let offer = self.offers.build(profile, recommendation, self.clock.now())?;

        tracing::info!(
            user_id = %offer.user_id,
            offer_id = %offer.offer_id,
            offer_type = %offer.offer_type,
            tier = %offer.discount_tier,
            final_price = %offer.final_price,
            lead_status = %lead_score.lead_status,
            "Created dynamic offer"
        );
        metrics::counter!("offers_created_total", "tier" => offer.discount_tier.as_str())
            .increment(1);

        self.offer_store.put(offer.clone())?;
        Ok(offer)
    }

    /// Detect a C1 learner with chronic management failures
    ///
    /// On a match the profile is scored (and stored) and an executive module
    /// offer at the limited-time tier is created.
    pub fn check_potential_lead_criteria(
        &self,
        profile: &UserProfile,
        patterns: &[ErrorPattern],
    ) -> Result<(bool, Option<DynamicOffer>)> {
        let Some(pattern) = PotentialLeadGate::new(&self.config).matching_pattern(profile, patterns)
        else {
            return Ok((false, None));
        };

        tracing::info!(
            user_id = %profile.user_id,
            failure_rate = pattern.failure_rate,
            error_count = pattern.error_count,
            "Potential lead detected"
        );

        let lead_score = self.calculate_lead_score(profile, patterns)?;
        let recommendation =
            OfferRecommender::new(&self.config, self.catalog()).potential_lead_offer(pattern);
        let offer = self.create_dynamic_offer(profile, &lead_score, &recommendation)?;

        Ok((true, Some(offer)))
    }

    /// Append an error to the user's history, returning the history length
    ///
    /// Events without a timestamp are stamped with the current time, and a
    /// missing session id becomes `session-<millis>`.
    pub fn track_error(&self, user_id: &str, mut event: ErrorEvent) -> Result<usize> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user_id is required".to_string()));
        }
        if event.error.trim().is_empty() {
            return Err(Error::InvalidInput("error is required".to_string()));
        }
        if event.domain.as_deref().map_or(true, |d| d.trim().is_empty()) {
            return Err(Error::InvalidInput("domain is required".to_string()));
        }

        let now = self.clock.now();
        event.timestamp.get_or_insert(now);
        if event.session_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            event.session_id = Some(format!("session-{}", now.timestamp_millis()));
        }

        let domain = event.domain_or_default().to_string();
        let category = event.category.as_str();
        let count = self.error_history.append(user_id, event)?;
        tracing::debug!(
            user_id = %user_id,
            domain = %domain,
            category,
            total_errors = count,
            "Tracked error"
        );
        Ok(count)
    }

    /// Score a user from their stored error history
    ///
    /// Only events the analyzer can use count toward the minimum.
    /// Potential leads also receive an offer built from their top
    /// recommendation.
    pub fn analyze_lead(&self, profile: &UserProfile) -> Result<LeadAnalysis> {
        let history = self.error_history.history(&profile.user_id)?;
        let required = self.config.analysis.min_errors_for_analysis;
        let current = history.iter().filter(|e| e.is_analyzable()).count();

        if current < required {
            tracing::debug!(
                user_id = %profile.user_id,
                current,
                required,
                "Not enough errors for lead analysis"
            );
            return Ok(LeadAnalysis::InsufficientData { required, current });
        }

        let patterns = self.analyze_error_patterns(&profile.user_id, &history);
        let lead_score = self.calculate_lead_score(profile, &patterns)?;

        let offer = match lead_score.top_recommendation() {
            Some(top) if lead_score.lead_status == LeadStatus::PotentialLead => {
                Some(self.create_dynamic_offer(profile, &lead_score, top)?)
            }
            _ => None,
        };

        Ok(LeadAnalysis::Scored { lead_score, offer })
    }

    /// Newest unexpired offer for a user
    pub fn active_offer_for(&self, user_id: &str) -> Result<Option<DynamicOffer>> {
        let now = self.clock.now();
        Ok(self
            .offer_store
            .list_for_user(user_id)?
            .into_iter()
            .rev()
            .find(|offer| !offer.is_expired(now)))
    }

    /// Accept an offer on behalf of its owner
    ///
    /// Removing the offer from the store claims it, so an offer is accepted
    /// at most once. A rejected claim puts the offer back. Payment is handled
    /// elsewhere.
    pub fn accept_offer(&self, user_id: &str, offer_id: &str) -> Result<OfferAcceptance> {
        let now = self.clock.now();

        let Some(offer) = self.offer_store.remove(offer_id)? else {
            return Err(Error::OfferNotFound(offer_id.to_string()));
        };

        if offer.user_id != user_id {
            self.offer_store.put(offer)?;
            return Err(Error::OfferNotFound(offer_id.to_string()));
        }

        if offer.is_expired(now) {
            let err = Error::OfferExpired {
                offer_id: offer.offer_id.clone(),
                expired_at: offer.expires_at,
            };
            self.offer_store.put(offer)?;
            return Err(err);
        }

        let acceptance = OfferAcceptance {
            order_id: format!("ORDER-{}", uuid::Uuid::new_v4()),
            offer_id: offer.offer_id,
            user_id: offer.user_id,
            module_name: offer.module_name,
            amount: offer.final_price,
            accepted_at: now,
        };

        tracing::info!(
            user_id = %acceptance.user_id,
            offer_id = %acceptance.offer_id,
            order_id = %acceptance.order_id,
            amount = %acceptance.amount,
            "Offer accepted"
        );

        Ok(acceptance)
    }

    /// Check whether a free user is ready for the executive upgrade
    pub fn detect_conversion_candidate(
        &self,
        profile: &UserProfile,
        sessions: &[SessionSummary],
    ) -> Option<ConversionCandidate> {
        self.conversion.detect(profile, sessions, self.clock.now())
    }
}
