//! Error history store

use parking_lot::RwLock;
use std::collections::HashMap;

use fluency_leads_core::{ErrorEvent, ErrorHistoryStore, Result};

/// Per-user error events in arrival order
#[derive(Default)]
pub struct InMemoryErrorHistoryStore {
    history: RwLock<HashMap<String, Vec<ErrorEvent>>>,
}

impl InMemoryErrorHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ErrorHistoryStore for InMemoryErrorHistoryStore {
    fn append(&self, user_id: &str, event: ErrorEvent) -> Result<usize> {
        let mut history = self.history.write();
        let events = history.entry(user_id.to_string()).or_default();
        events.push(event);
        Ok(events.len())
    }

    fn history(&self, user_id: &str) -> Result<Vec<ErrorEvent>> {
        Ok(self
            .history
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    fn clear(&self, user_id: &str) -> Result<()> {
        self.history.write().remove(user_id);
        Ok(())
    }
}
