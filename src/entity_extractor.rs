//! §6 named-entity extractor contract (external collaborator).
//!
//! The production implementation is a hosted large-language-model call
//! (Gemini, via Vertex AI); that is explicitly out of scope here. This
//! module specifies the trait the real implementation must satisfy, plus
//! one heuristic stand-in good enough for tests and offline use.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Person,
    Organization,
    Vessel,
    Aircraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEntity {
    pub name: String,
    pub entity_type: EntityType,
}

/// Turns free text into `{name, entity_type}` tuples over the closed set
/// `{person, organization, vessel, aircraft}`. Other entity kinds
/// (locations, dates, money) are not part of this contract and must be
/// dropped by implementations.
pub trait EntityExtractor {
    fn extract(&self, text: &str) -> Vec<ExtractedEntity>;
}

static ORG_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][\w&.,'-]*(?:\s+[A-Z][\w&.,'-]*)*\s+(?:Corp|Corporation|Inc|LLC|Ltd|Company|Group|Holdings|Bank))\b")
        .unwrap()
});

static VESSEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\b(?:M/?V|vessel)\s+["']?([A-Z][\w .'-]*)["']?"#).unwrap()
});

static AIRCRAFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\baircraft\s+(?:tail number\s+)?([A-Z0-9-]{3,})\b").unwrap());

static PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,3})\b").unwrap());

/// Regex-based heuristic extractor. Not the production implementation
/// (that's a hosted LLM call) — good enough to exercise the trait contract
/// and for offline tests.
#[derive(Debug, Default)]
pub struct HeuristicEntityExtractor;

impl EntityExtractor for HeuristicEntityExtractor {
    fn extract(&self, text: &str) -> Vec<ExtractedEntity> {
        let mut found = Vec::new();

        for cap in VESSEL_RE.captures_iter(text) {
            found.push(ExtractedEntity {
                name: cap[1].trim().to_string(),
                entity_type: EntityType::Vessel,
            });
        }
        for cap in AIRCRAFT_RE.captures_iter(text) {
            found.push(ExtractedEntity {
                name: cap[1].trim().to_string(),
                entity_type: EntityType::Aircraft,
            });
        }
        for cap in ORG_SUFFIX_RE.captures_iter(text) {
            found.push(ExtractedEntity {
                name: cap[1].trim().to_string(),
                entity_type: EntityType::Organization,
            });
        }
        for cap in PERSON_RE.captures_iter(text) {
            let name = cap[1].trim().to_string();
            if found.iter().any(|e| e.name == name) {
                continue;
            }
            found.push(ExtractedEntity {
                name,
                entity_type: EntityType::Person,
            });
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_a_vessel_name() {
        let extractor = HeuristicEntityExtractor;
        let hits = extractor.extract("The vessel \"Sea Pioneer\" departed port yesterday.");
        assert!(hits
            .iter()
            .any(|e| e.entity_type == EntityType::Vessel && e.name == "Sea Pioneer"));
    }

    #[test]
    fn extracts_an_organization_by_suffix() {
        let extractor = HeuristicEntityExtractor;
        let hits = extractor.extract("Payments were routed through Northbridge Holdings Inc.");
        assert!(hits
            .iter()
            .any(|e| e.entity_type == EntityType::Organization && e.name.contains("Northbridge Holdings Inc")));
    }

    #[test]
    fn extracts_a_person_name() {
        let extractor = HeuristicEntityExtractor;
        let hits = extractor.extract("John Smith signed the document.");
        assert!(hits
            .iter()
            .any(|e| e.entity_type == EntityType::Person && e.name == "John Smith"));
    }
}
