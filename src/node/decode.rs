//! Lenient decoding of stored nodes.
//!
//! Vectors and keyword sets are kept as JSON text. A blob that does not parse
//! into the expected shape is reported and then treated as absent, so one bad
//! row never takes down a whole graph.

use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

use super::types::{MeaningNode, StoredNode};

/// Why a stored field could not be used.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array, got {0}")]
    NotAnArray(&'static str),

    #[error("element {index} is not a finite f32")]
    NonNumeric { index: usize },

    #[error("element {index} is not a string")]
    NonString { index: usize },
}

/// Parse a vector blob. Blank text decodes to `None`.
pub fn decode_vector(raw: &str) -> Result<Option<Vec<f32>>, DecodeError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(None);
    }
    let items = json_array(raw)?;
    let mut vector = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        // finite as f64 is not enough: 1e39 overflows f32 to inf
        let value = item
            .as_f64()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .ok_or(DecodeError::NonNumeric { index })?;
        vector.push(value);
    }
    Ok(Some(vector))
}

/// Parse a keyword blob. Tags are trimmed; blank tags are dropped.
pub fn decode_keywords(raw: &str) -> Result<BTreeSet<String>, DecodeError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(BTreeSet::new());
    }
    let items = json_array(raw)?;
    let mut keywords = BTreeSet::new();
    for (index, item) in items.iter().enumerate() {
        let tag = item.as_str().ok_or(DecodeError::NonString { index })?;
        let tag = tag.trim();
        if !tag.is_empty() {
            keywords.insert(tag.to_string());
        }
    }
    Ok(keywords)
}

fn json_array(raw: &str) -> Result<Vec<serde_json::Value>, DecodeError> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Array(items) => Ok(items),
        serde_json::Value::Object(_) => Err(DecodeError::NotAnArray("object")),
        serde_json::Value::String(_) => Err(DecodeError::NotAnArray("string")),
        serde_json::Value::Number(_) => Err(DecodeError::NotAnArray("number")),
        serde_json::Value::Bool(_) => Err(DecodeError::NotAnArray("bool")),
        serde_json::Value::Null => Err(DecodeError::NotAnArray("null")),
    }
}

/// Convert a stored row into a [`MeaningNode`]. Never fails: malformed
/// fields are logged and dropped.
pub fn decode_node(stored: &StoredNode) -> MeaningNode {
    let vector = match stored.vector.as_deref().map(decode_vector) {
        None => None,
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            warn!(node = %stored.id, field = "vector", error = %e, "ignoring malformed field");
            None
        }
    };

    let keywords = match stored.keywords.as_deref().map(decode_keywords) {
        None => BTreeSet::new(),
        Some(Ok(k)) => k,
        Some(Err(e)) => {
            warn!(node = %stored.id, field = "keywords", error = %e, "ignoring malformed field");
            BTreeSet::new()
        }
    };

    let logic_score = match stored.logic_score {
        Some(s) if s.is_finite() => Some(s.clamp(0.0, 1.0)),
        Some(s) => {
            warn!(node = %stored.id, field = "logic_score", value = s, "ignoring non-finite score");
            None
        }
        None => None,
    };

    MeaningNode {
        id: stored.id.clone(),
        content: stored.content.clone(),
        care_point: stored.care_point.clone(),
        vector,
        keywords,
        logic_score,
    }
}

/// Serialize a vector for storage.
pub fn encode_vector(vector: &[f32]) -> String {
    serde_json::Value::from(vector.iter().map(|&x| f64::from(x)).collect::<Vec<_>>()).to_string()
}

/// Serialize a keyword set for storage.
pub fn encode_keywords(keywords: &BTreeSet<String>) -> String {
    serde_json::Value::from(keywords.iter().cloned().collect::<Vec<_>>()).to_string()
}
