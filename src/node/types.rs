//! Meaning node type definitions.
//!
//! [`MeaningNode`] is the typed record the graph builder consumes.
//! [`StoredNode`] is the row shape in the node table, where the vector and
//! keyword set are still serialized JSON text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A unit of extracted insight, ready for similarity scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeaningNode {
    /// Opaque identifier, unique within one graph.
    pub id: String,
    /// Full insight text. Used as the label when no care-point exists.
    pub content: String,
    /// Short care-point label extracted alongside the insight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care_point: Option<String>,
    /// Embedding vector, if the analysis step produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    /// Keyword tags. Ordered so output stays deterministic.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    /// Logic score in `[0.0, 1.0]`. Only scales the rendered node size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_score: Option<f64>,
}

impl MeaningNode {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            care_point: None,
            vector: None,
            keywords: BTreeSet::new(),
            logic_score: None,
        }
    }

    pub fn with_vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_care_point(mut self, care_point: impl Into<String>) -> Self {
        self.care_point = Some(care_point.into());
        self
    }

    pub fn with_logic_score(mut self, score: f64) -> Self {
        self.logic_score = Some(score);
        self
    }

    /// Care-point if present and non-blank, otherwise the content.
    pub fn display_text(&self) -> &str {
        match self.care_point.as_deref() {
            Some(cp) if !cp.trim().is_empty() => cp,
            _ => &self.content,
        }
    }
}

/// A node row as stored, matching the `meaning_nodes` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredNode {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Owning user.
    pub owner: String,
    pub content: String,
    pub care_point: Option<String>,
    /// JSON array of numbers, e.g. `[0.1, 0.2]`.
    pub vector: Option<String>,
    /// JSON array of strings, e.g. `["family", "work"]`.
    pub keywords: Option<String>,
    pub logic_score: Option<f64>,
    pub is_deleted: bool,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}
