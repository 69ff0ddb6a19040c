//! Lead score store

use parking_lot::RwLock;
use std::collections::HashMap;

use fluency_leads_core::{LeadScore, LeadScoreStore, Result};

/// Latest lead score per user, kept in memory
#[derive(Default)]
pub struct InMemoryLeadScoreStore {
    scores: RwLock<HashMap<String, LeadScore>>,
}

impl InMemoryLeadScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.scores.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.read().is_empty()
    }
}

impl LeadScoreStore for InMemoryLeadScoreStore {
    fn get(&self, user_id: &str) -> Result<Option<LeadScore>> {
        Ok(self.scores.read().get(user_id).cloned())
    }

    fn put(&self, score: LeadScore) -> Result<()> {
        let previous = self.scores.write().insert(score.user_id.clone(), score);
        if let Some(previous) = previous {
            tracing::trace!(
                user_id = %previous.user_id,
                previous_status = %previous.lead_status,
                "Replaced stored lead score"
            );
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<LeadScore>> {
        let mut scores: Vec<_> = self.scores.read().values().cloned().collect();
        scores.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(scores)
    }
}
