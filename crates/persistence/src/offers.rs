//! Dynamic offer store

use parking_lot::RwLock;
use std::collections::HashMap;

use fluency_leads_core::{DynamicOffer, OfferStore, Result};

/// Offers keyed by offer id, kept in memory
///
/// Expired offers are not evicted; expiry is checked by the reader.
#[derive(Default)]
pub struct InMemoryOfferStore {
    offers: RwLock<HashMap<String, DynamicOffer>>,
}

impl InMemoryOfferStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.offers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.read().is_empty()
    }
}

impl OfferStore for InMemoryOfferStore {
    fn get(&self, offer_id: &str) -> Result<Option<DynamicOffer>> {
        Ok(self.offers.read().get(offer_id).cloned())
    }

    fn put(&self, offer: DynamicOffer) -> Result<()> {
        self.offers.write().insert(offer.offer_id.clone(), offer);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DynamicOffer>> {
        Ok(self.offers.read().values().cloned().collect())
    }

    fn remove(&self, offer_id: &str) -> Result<Option<DynamicOffer>> {
        Ok(self.offers.write().remove(offer_id))
    }
}
