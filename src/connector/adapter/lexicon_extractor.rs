use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::application::EntityExtractor;
use crate::domain::{DomainError, Entity, ANATOMY_LABEL};

const BUILTIN_LEXICON: &[&str] = &[
    "cœur", "coeur", "foie", "rein", "reins", "poumon", "poumons", "cerveau", "cervelet",
    "estomac", "rate", "pancréas", "vessie", "vésicule biliaire", "intestin", "intestin grêle",
    "gros intestin", "côlon", "duodénum", "appendice", "œsophage", "oesophage", "trachée",
    "larynx", "pharynx", "thyroïde", "glande thyroïde", "aorte", "artère", "veine cave",
    "fémur", "tibia", "fibula", "péroné", "humérus", "radius", "ulna", "cubitus", "crâne",
    "mandibule", "clavicule", "omoplate", "scapula", "sternum", "côte", "côtes", "vertèbre",
    "colonne vertébrale", "bassin", "genou", "épaule", "coude", "poignet", "cheville", "hanche",
    "main", "pied", "muscle", "biceps", "triceps", "quadriceps", "diaphragme", "utérus",
    "ovaire", "prostate", "testicule", "rétine", "cornée", "œil", "oreille interne", "cochlée",
    "nerf sciatique", "nerf vague", "moelle épinière", "hypothalamus", "hippocampe", "peau",
    "ménisque", "ligament croisé", "tendon d'achille",
];

/// Dictionary-based extractor tagging known anatomical structures.
///
/// Runs without a model download. Every hit is labelled `Anatomie` with a
/// score of 1.0; multi-word entries win over their single-word prefixes.
pub struct LexiconEntityExtractor {
    pattern: Regex,
    size: usize,
}

impl LexiconEntityExtractor {
    pub fn new() -> Result<Self, DomainError> {
        Self::with_terms(std::iter::empty::<&str>())
    }

    /// Built-in lexicon extended with `extra` entries.
    pub fn with_terms<I, S>(extra: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = BUILTIN_LEXICON
            .iter()
            .map(|s| s.to_string())
            .chain(extra.into_iter().map(|s| s.as_ref().trim().to_lowercase()))
            .filter(|s| !s.is_empty())
            .collect();
        entries.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        entries.dedup();

        let alternation = entries
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
            .case_insensitive(true)
            .build()
            .map_err(|e| DomainError::config(format!("Invalid lexicon: {}", e)))?;

        Ok(Self {
            pattern,
            size: entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

#[async_trait]
impl EntityExtractor for LexiconEntityExtractor {
    async fn predict(
        &self,
        text: &str,
        labels: &[&str],
        threshold: f32,
    ) -> Result<Vec<Entity>, DomainError> {
        if !labels.contains(&ANATOMY_LABEL) || threshold > 1.0 {
            return Ok(vec![]);
        }

        let entities: Vec<Entity> = self
            .pattern
            .find_iter(text)
            .map(|m| Entity::new(m.as_str(), ANATOMY_LABEL, 1.0))
            .collect();

        debug!("Lexicon matched {} entities", entities.len());
        Ok(entities)
    }

    fn model_name(&self) -> &str {
        "lexicon"
    }
}
