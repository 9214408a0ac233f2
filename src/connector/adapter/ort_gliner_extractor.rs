use std::path::PathBuf;
use std::sync::{Arc, LazyLock, Mutex};

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use regex::Regex;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::application::EntityExtractor;
use crate::domain::{DomainError, Entity};

const DEFAULT_MODEL_ID: &str = "almanach/camembert-bio-gliner-v0.1";
const ENTITY_TOKEN: &str = "<<ENT>>";
const SEPARATOR_TOKEN: &str = "<<SEP>>";
/// Longest span, in words, the model scores.
const MAX_SPAN_WIDTH: usize = 12;
const MAX_WORDS: usize = 384;

static WORD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:[-_]\w+)*|\S").expect("Invalid word regex"));

/// A word of the input text with its byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Word {
    start: usize,
    end: usize,
}

/// A scored candidate span over word indices (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    start: usize,
    end: usize,
    label: usize,
    score: f32,
}

impl Span {
    fn overlaps(&self, other: &Span) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}

/// GLiNER span-based NER run through ONNX Runtime.
///
/// Expects an ONNX export taking `input_ids`, `attention_mask`,
/// `words_mask`, `text_lengths`, `span_idx` and `span_mask`, and producing
/// `logits` shaped `[batch, words, max_width, labels]`. The tokenizer must
/// know the `<<ENT>>` and `<<SEP>>` prompt tokens.
pub struct OrtGlinerExtractor {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
}

impl OrtGlinerExtractor {
    pub fn new(model_id: Option<&str>) -> Result<Self, DomainError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Initializing GLiNER extractor with model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::internal(format!("Failed to download tokenizer: {}", e)))?;

        let model_path = repo
            .get("onnx/model.onnx")
            .or_else(|_| repo.get("model.onnx"))
            .map_err(|e| DomainError::internal(format!("Failed to download ONNX model: {}", e)))?;

        Self::from_paths(model_path, tokenizer_path, model_id)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
    ) -> Result<Self, DomainError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Session::builder()
            .map_err(|e| DomainError::internal(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DomainError::internal(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| DomainError::internal(format!("Failed to load ONNX model: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::internal(format!("Failed to load tokenizer: {}", e)))?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name: model_name.to_string(),
        })
    }

    fn extract(&self, text: &str, labels: &[&str], threshold: f32) -> Result<Vec<Entity>, DomainError> {
        let words = split_words(text);
        if words.is_empty() || labels.is_empty() {
            return Ok(vec![]);
        }
        let num_words = words.len();

        let mut prompt: Vec<&str> = Vec::with_capacity(labels.len() * 2 + 1 + num_words);
        for &label in labels {
            prompt.push(ENTITY_TOKEN);
            prompt.push(label);
        }
        prompt.push(SEPARATOR_TOKEN);
        let prompt_len = prompt.len();
        prompt.extend(words.iter().map(|w| &text[w.start..w.end]));

        let encoding = self
            .tokenizer
            .encode(prompt.as_slice(), true)
            .map_err(|e| DomainError::extraction(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&x| x as i64)
            .collect();
        let words_mask = words_mask(encoding.get_word_ids(), prompt_len);
        let seq_len = input_ids.len();

        let (span_idx, span_mask) = span_inputs(num_words);
        let num_spans = span_mask.len();

        let input_ids_tensor = Tensor::from_array(([1, seq_len], input_ids))
            .map_err(|e| DomainError::extraction(format!("Failed to create input_ids tensor: {}", e)))?;
        let attention_mask_tensor = Tensor::from_array(([1, seq_len], attention_mask))
            .map_err(|e| DomainError::extraction(format!("Failed to create attention_mask tensor: {}", e)))?;
        let words_mask_tensor = Tensor::from_array(([1, seq_len], words_mask))
            .map_err(|e| DomainError::extraction(format!("Failed to create words_mask tensor: {}", e)))?;
        let text_lengths_tensor = Tensor::from_array(([1usize, 1], vec![num_words as i64]))
            .map_err(|e| DomainError::extraction(format!("Failed to create text_lengths tensor: {}", e)))?;
        let span_idx_tensor = Tensor::from_array(([1, num_spans, 2], span_idx))
            .map_err(|e| DomainError::extraction(format!("Failed to create span_idx tensor: {}", e)))?;
        let span_mask_tensor = Tensor::from_array(([1, num_spans], span_mask))
            .map_err(|e| DomainError::extraction(format!("Failed to create span_mask tensor: {}", e)))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "words_mask" => words_mask_tensor,
                "text_lengths" => text_lengths_tensor,
                "span_idx" => span_idx_tensor,
                "span_mask" => span_mask_tensor,
            ])
            .map_err(|e| DomainError::extraction(format!("Inference failed: {}", e)))?;

        let logits = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| DomainError::extraction("No output tensor found"))?;

        let (shape, data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| DomainError::extraction(format!("Failed to extract logits: {}", e)))?;

        let shape: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        debug!("Logits shape: {:?}", shape);

        if shape.len() != 4 || shape[3] != labels.len() {
            return Err(DomainError::extraction(format!(
                "Unexpected logits shape: {:?}",
                shape
            )));
        }

        let spans = decode_spans(data, shape[1].min(num_words), shape[2], shape[3], threshold);

        Ok(spans
            .into_iter()
            .map(|span| {
                Entity::new(
                    &text[words[span.start].start..words[span.end].end],
                    labels[span.label],
                    span.score,
                )
            })
            .collect())
    }
}

/// Split text into GLiNER words, capped at [`MAX_WORDS`].
fn split_words(text: &str) -> Vec<Word> {
    WORD_REGEX
        .find_iter(text)
        .take(MAX_WORDS)
        .map(|m| Word {
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Mark the first sub-token of each text word with its 1-based word index.
fn words_mask(word_ids: &[Option<u32>], prompt_len: usize) -> Vec<i64> {
    let mut mask = vec![0i64; word_ids.len()];
    let mut previous: Option<u32> = None;

    for (i, word_id) in word_ids.iter().enumerate() {
        if let Some(w) = *word_id {
            let w_idx = w as usize;
            if w_idx >= prompt_len && previous != Some(w) {
                mask[i] = (w_idx - prompt_len + 1) as i64;
            }
        }
        previous = *word_id;
    }

    mask
}

/// Every `(start, start + width)` word span; spans running past the text
/// are zeroed and masked out.
fn span_inputs(num_words: usize) -> (Vec<i64>, Vec<bool>) {
    let mut idx = Vec::with_capacity(num_words * MAX_SPAN_WIDTH * 2);
    let mut mask = Vec::with_capacity(num_words * MAX_SPAN_WIDTH);

    for start in 0..num_words {
        for width in 0..MAX_SPAN_WIDTH {
            let end = start + width;
            if end < num_words {
                idx.extend([start as i64, end as i64]);
                mask.push(true);
            } else {
                idx.extend([0, 0]);
                mask.push(false);
            }
        }
    }

    (idx, mask)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Threshold the logits and keep the best non-overlapping spans, in text order.
fn decode_spans(
    logits: &[f32],
    num_words: usize,
    max_width: usize,
    num_labels: usize,
    threshold: f32,
) -> Vec<Span> {
    let mut candidates = Vec::new();

    for start in 0..num_words {
        for width in 0..max_width {
            let end = start + width;
            if end >= num_words {
                break;
            }
            for label in 0..num_labels {
                let idx = (start * max_width + width) * num_labels + label;
                let Some(&logit) = logits.get(idx) else {
                    continue;
                };
                let score = sigmoid(logit);
                if score >= threshold {
                    candidates.push(Span {
                        start,
                        end,
                        label,
                        score,
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut kept: Vec<Span> = Vec::new();
    for span in candidates {
        if kept.iter().all(|k| !k.overlaps(&span)) {
            kept.push(span);
        }
    }

    kept.sort_by_key(|s| s.start);
    kept
}

#[async_trait]
impl EntityExtractor for OrtGlinerExtractor {
    async fn predict(
        &self,
        text: &str,
        labels: &[&str],
        threshold: f32,
    ) -> Result<Vec<Entity>, DomainError> {
        let entities = self.extract(text, labels, threshold)?;
        debug!("GLiNER found {} entities", entities.len());
        Ok(entities)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words() {
        let text = "l'anatomie du cœur-poumon.";
        let words: Vec<&str> = split_words(text)
            .iter()
            .map(|w| &text[w.start..w.end])
            .collect();
        assert_eq!(words, vec!["l", "'", "anatomie", "du", "cœur-poumon", "."]);
    }

    #[test]
    fn test_words_mask_marks_first_subtoken() {
        // [CLS] <<ENT>> label <<SEP>> w0 w0' w1 [SEP]
        let word_ids = [None, Some(0), Some(1), Some(2), Some(3), Some(3), Some(4), None];
        let mask = words_mask(&word_ids, 3);
        assert_eq!(mask, vec![0, 0, 0, 0, 1, 0, 2, 0]);
    }

    #[test]
    fn test_span_inputs_mask_overflow() {
        let (idx, mask) = span_inputs(2);
        assert_eq!(mask.len(), 2 * MAX_SPAN_WIDTH);
        assert_eq!(&idx[..4], &[0, 0, 0, 1]);
        assert!(mask[0] && mask[1] && !mask[2]);
        assert!(mask[MAX_SPAN_WIDTH] && !mask[MAX_SPAN_WIDTH + 1]);
    }

    #[test]
    fn test_decode_keeps_best_non_overlapping() {
        // 3 words, width 2, 1 label
        let logits = [
            2.0, 3.0, // (0,0) (0,1)
            -5.0, -5.0, // (1,1) (1,2)
            1.0, 0.0, // (2,2) (2,3: out of range)
        ];
        let spans = decode_spans(&logits, 3, 2, 1, 0.5);

        let ranges: Vec<(usize, usize)> = spans.iter().map(|s| (s.start, s.end)).collect();
        assert_eq!(ranges, vec![(0, 1), (2, 2)]);
    }

    #[tokio::test]
    #[ignore = "Requires model download"]
    async fn test_gliner_extracts_anatomy() {
        let extractor = OrtGlinerExtractor::new(None).expect("Failed to create extractor");
        let entities = extractor
            .predict("douleur au niveau du foie", &crate::domain::ENTITY_LABELS, 0.2)
            .await
            .unwrap();
        assert!(entities.iter().any(|e| e.is_anatomy()));
    }
}
