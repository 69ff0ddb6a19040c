//! Offer Catalog Configuration
//!
//! Prices, display names, benefits and social proof per offer type, the
//! domain → offer table, and urgency copy per discount tier.
//!
//! The catalog is an exhaustive mapping: `validate()` rejects a catalog that
//! misses any offer type or tier. Lookups still return an error rather than a
//! default so that an unvalidated catalog can never price an offer at zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use fluency_leads_core::{DiscountTier, Error, Money, OfferType, ProficiencyLevel, Result};

use crate::ConfigError;

/// Placeholder replaced with the learner's level in a personalized benefit
pub const LEVEL_PLACEHOLDER: &str = "{level}";

/// One purchasable module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name
    pub module_name: String,

    /// List price in USD
    pub price: f64,

    #[serde(default)]
    pub benefits: Vec<String>,

    /// Extra benefit line mentioning the learner's level, e.g.
    /// "Personalized for {level} level learners"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalized_benefit: Option<String>,

    pub social_proof: String,
}

/// Offer catalog loaded from catalog.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferCatalog {
    pub modules: BTreeMap<OfferType, CatalogEntry>,

    /// Domain tag → offer type. Keys are matched case-insensitively.
    pub domain_offers: BTreeMap<String, OfferType>,

    pub urgency_messages: BTreeMap<DiscountTier, String>,
}

impl OfferCatalog {
    /// Load from a YAML file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let catalog: OfferCatalog = crate::read_yaml(path.as_ref())?;
        let catalog = catalog.normalized();
        catalog.validate()?;
        tracing::debug!(
            path = %path.as_ref().display(),
            modules = catalog.modules.len(),
            "Loaded offer catalog"
        );
        Ok(catalog)
    }

    /// Parse from a YAML string and validate
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ConfigError> {
        let catalog: OfferCatalog = serde_yaml::from_str(yaml)?;
        let catalog = catalog.normalized();
        catalog.validate()?;
        Ok(catalog)
    }

    fn normalized(mut self) -> Self {
        self.domain_offers = self
            .domain_offers
            .into_iter()
            .map(|(domain, offer)| (domain.trim().to_lowercase(), offer))
            .collect();
        self
    }

    /// Check that every offer type and tier has a complete entry
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for offer_type in OfferType::ALL {
            let Some(entry) = self.modules.get(&offer_type) else {
                return Err(ConfigError::MissingField(format!("modules.{}", offer_type)));
            };

            if entry.module_name.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "modules.{}.module_name",
                    offer_type
                )));
            }

            match Money::from_dollars(entry.price) {
                Some(price) if price > Money::ZERO => {}
                _ => {
                    return Err(ConfigError::invalid(
                        format!("modules.{}.price", offer_type),
                        format!("Must be a positive amount, got {}", entry.price),
                    ))
                }
            }

            if entry.social_proof.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "modules.{}.social_proof",
                    offer_type
                )));
            }
        }

        for tier in DiscountTier::ALL {
            match self.urgency_messages.get(&tier) {
                Some(message) if !message.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::MissingField(format!(
                        "urgency_messages.{}",
                        tier
                    )))
                }
            }
        }

        if self.domain_offers.is_empty() {
            tracing::warn!("Offer catalog maps no domains; no offers will be recommended");
        }

        Ok(())
    }

    fn entry(&self, offer_type: OfferType, table: &'static str) -> Result<&CatalogEntry> {
        self.modules
            .get(&offer_type)
            .ok_or(Error::MissingCatalogEntry { offer_type, table })
    }

    /// List price of a module
    pub fn price(&self, offer_type: OfferType) -> Result<Money> {
        let entry = self.entry(offer_type, "price")?;
        Money::from_dollars(entry.price)
            .filter(|p| *p > Money::ZERO)
            .ok_or(Error::MissingCatalogEntry {
                offer_type,
                table: "price",
            })
    }

    /// Display name of a module
    pub fn module_name(&self, offer_type: OfferType) -> Result<&str> {
        Ok(self.entry(offer_type, "module_name")?.module_name.as_str())
    }

    /// Benefits list, with the personalized line (if any) appended
    pub fn benefits(&self, offer_type: OfferType, level: ProficiencyLevel) -> Result<Vec<String>> {
        let entry = self.entry(offer_type, "benefits")?;
        let mut benefits = entry.benefits.clone();
        if let Some(template) = &entry.personalized_benefit {
            benefits.push(template.replace(LEVEL_PLACEHOLDER, level.as_str()));
        }
        Ok(benefits)
    }

    pub fn social_proof(&self, offer_type: OfferType) -> Result<&str> {
        Ok(self.entry(offer_type, "social_proof")?.social_proof.as_str())
    }

    /// Urgency copy for a tier
    pub fn urgency_message(&self, tier: DiscountTier) -> Result<&str> {
        self.urgency_messages
            .get(&tier)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownDiscountTier(tier.to_string()))
    }

    /// Offer targeting a domain; unmapped domains yield `None`
    pub fn offer_for_domain(&self, domain: &str) -> Option<OfferType> {
        self.domain_offers
            .get(&domain.trim().to_lowercase())
            .copied()
    }
}

impl Default for OfferCatalog {
    fn default() -> Self {
        let mut modules = BTreeMap::new();
        modules.insert(
            OfferType::ExecutiveModule,
            CatalogEntry {
                module_name: "Executive IT English Module".to_string(),
                price: 299.00,
                benefits: vec![
                    "Master management terminology and leadership vocabulary".to_string(),
                    "Learn to conduct effective team meetings in English".to_string(),
                    "Practice strategic planning and decision-making discussions".to_string(),
                    "Handle conflict resolution and performance reviews".to_string(),
                    "Real-world IT management scenarios and role-plays".to_string(),
                ],
                personalized_benefit: Some(format!(
                    "Personalized for {} level learners",
                    LEVEL_PLACEHOLDER
                )),
                social_proof: "Join 2,340+ IT managers who improved their English leadership skills by 67% in 30 days".to_string(),
            },
        );
        modules.insert(
            OfferType::AdvancedBusiness,
            CatalogEntry {
                module_name: "Advanced Business Communication".to_string(),
                price: 249.00,
                benefits: vec![
                    "Professional email and report writing".to_string(),
                    "Business presentation skills".to_string(),
                    "Negotiation and persuasion techniques".to_string(),
                    "Cross-cultural communication".to_string(),
                    "Executive communication strategies".to_string(),
                ],
                personalized_benefit: None,
                social_proof: "Trusted by 5,000+ business professionals worldwide".to_string(),
            },
        );
        modules.insert(
            OfferType::TechnicalWriting,
            CatalogEntry {
                module_name: "Technical Writing Mastery".to_string(),
                price: 199.00,
                benefits: vec![
                    "Documentation best practices".to_string(),
                    "API documentation writing".to_string(),
                    "Technical proposal creation".to_string(),
                    "Code review communication".to_string(),
                    "Release notes and changelogs".to_string(),
                ],
                personalized_benefit: None,
                social_proof: "Used by engineers at Google, Microsoft, and Amazon".to_string(),
            },
        );
        modules.insert(
            OfferType::NegotiationSkills,
            CatalogEntry {
                module_name: "Negotiation Skills Pro".to_string(),
                price: 279.00,
                benefits: vec![
                    "Contract negotiation vocabulary".to_string(),
                    "Salary discussion techniques".to_string(),
                    "Vendor management communication".to_string(),
                    "Conflict de-escalation".to_string(),
                    "Win-win negotiation strategies".to_string(),
                ],
                personalized_benefit: None,
                social_proof: "4.9/5 rating from 1,200+ professionals".to_string(),
            },
        );

        let mut domain_offers = BTreeMap::new();
        domain_offers.insert("management".to_string(), OfferType::ExecutiveModule);
        domain_offers.insert("business".to_string(), OfferType::AdvancedBusiness);
        domain_offers.insert("technical".to_string(), OfferType::TechnicalWriting);
        domain_offers.insert("negotiation".to_string(), OfferType::NegotiationSkills);

        let mut urgency_messages = BTreeMap::new();
        urgency_messages.insert(
            DiscountTier::LimitedTime,
            "⚡ FLASH SALE: 40% OFF - Only 24 hours left!".to_string(),
        );
        urgency_messages.insert(
            DiscountTier::Exclusive,
            "🎯 Exclusive Offer: 30% OFF for C-level learners".to_string(),
        );
        urgency_messages.insert(
            DiscountTier::Premium,
            "🌟 Premium Discount: 20% OFF - Limited time".to_string(),
        );
        urgency_messages.insert(DiscountTier::Standard, "✨ Special Offer: 10% OFF".to_string());

        Self {
            modules,
            domain_offers,
            urgency_messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_complete() {
        let catalog = OfferCatalog::default();
        assert!(catalog.validate().is_ok());
        assert_eq!(
            catalog.price(OfferType::ExecutiveModule).unwrap(),
            Money::from_cents(29900)
        );
        assert_eq!(
            catalog.module_name(OfferType::NegotiationSkills).unwrap(),
            "Negotiation Skills Pro"
        );
    }

    #[test]
    fn test_personalized_benefit() {
        let catalog = OfferCatalog::default();
        let benefits = catalog
            .benefits(OfferType::ExecutiveModule, ProficiencyLevel::C1)
            .unwrap();
        assert_eq!(benefits.len(), 6);
        assert_eq!(benefits[5], "Personalized for C1 level learners");

        let plain = catalog
            .benefits(OfferType::TechnicalWriting, ProficiencyLevel::C1)
            .unwrap();
        assert_eq!(plain.len(), 5);
    }

    #[test]
    fn test_domain_lookup_is_case_insensitive() {
        let catalog = OfferCatalog::default();
        assert_eq!(
            catalog.offer_for_domain("Management"),
            Some(OfferType::ExecutiveModule)
        );
        assert_eq!(catalog.offer_for_domain("general"), None);
    }

    #[test]
    fn test_missing_module_fails_validation() {
        let mut catalog = OfferCatalog::default();
        catalog.modules.remove(&OfferType::TechnicalWriting);

        let err = catalog.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField(ref f) if f == "modules.technical_writing_mastery")
        );

        // Unvalidated lookups fail loudly instead of pricing at zero
        assert_eq!(
            catalog.price(OfferType::TechnicalWriting),
            Err(Error::MissingCatalogEntry {
                offer_type: OfferType::TechnicalWriting,
                table: "price",
            })
        );
    }

    #[test]
    fn test_missing_tier_message_fails_validation() {
        let mut catalog = OfferCatalog::default();
        catalog.urgency_messages.remove(&DiscountTier::Premium);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut catalog = OfferCatalog::default();
        if let Some(entry) = catalog.modules.get_mut(&OfferType::AdvancedBusiness) {
            entry.price = 0.0;
        }
        assert!(catalog.validate().is_err());
        assert!(catalog.price(OfferType::AdvancedBusiness).is_err());
    }

    #[test]
    fn test_yaml_catalog_round_trip() {
        let yaml = serde_yaml::to_string(&OfferCatalog::default()).unwrap();
        let parsed = OfferCatalog::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, OfferCatalog::default());
    }

    #[test]
    fn test_yaml_domain_keys_are_normalized() {
        let mut catalog = OfferCatalog::default();
        catalog.domain_offers.clear();
        catalog
            .domain_offers
            .insert(" Leadership ".to_string(), OfferType::ExecutiveModule);
        let yaml = serde_yaml::to_string(&catalog).unwrap();

        let parsed = OfferCatalog::from_yaml(&yaml).unwrap();
        assert_eq!(
            parsed.offer_for_domain("leadership"),
            Some(OfferType::ExecutiveModule)
        );
    }
}
