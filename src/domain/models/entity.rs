use serde::{Deserialize, Serialize};

/// Label retained by the pipeline; every other label is discarded.
pub const ANATOMY_LABEL: &str = "Anatomie";

/// Confidence threshold passed to the extractor.
pub const DEFAULT_THRESHOLD: f32 = 0.2;

/// Label schema the extractor is always invoked with.
pub const ENTITY_LABELS: [&str; 12] = [
    "Examen Médical",
    "Anatomie",
    "Maladie",
    "Symptôme",
    "Signe",
    "Traitement",
    "Médicament",
    "État Physiologique",
    "Facteur de Risque",
    "Pathogène",
    "Unité de Mesure",
    "terme médical",
];

/// A labelled span returned by an entity extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub score: f32,
}

impl Entity {
    pub fn new(text: impl Into<String>, label: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
            score,
        }
    }

    pub fn is_anatomy(&self) -> bool {
        self.label == ANATOMY_LABEL
    }
}
