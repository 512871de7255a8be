//! Display directives for the renderer: edge line styles per tier, node
//! labels, node sizes.

use serde::Serialize;

use super::score::Tier;

/// Labels in the compact view are cut to this many characters.
pub const COMPACT_LABEL_CHARS: usize = 10;
/// Labels in the detailed view are cut to this many characters.
pub const DETAILED_LABEL_CHARS: usize = 40;
/// Size multiplier used when a node carries no logic score.
pub const DEFAULT_LOGIC_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Solid,
    Dashed,
}

/// Line style for one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub width: f64,
    pub color: &'static str,
    #[serde(rename = "type")]
    pub line: LineType,
    pub opacity: f64,
}

impl EdgeStyle {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            // thick, bright
            Tier::Strong => Self {
                width: 3.0,
                color: "#f5b942",
                line: LineType::Solid,
                opacity: 0.9,
            },
            // thin, dashed
            Tier::Weak => Self {
                width: 1.0,
                color: "#8a9bb0",
                line: LineType::Dashed,
                opacity: 0.5,
            },
        }
    }
}

/// `base_symbol_size * (0.8 + logic_score)`, rounded to two decimals.
pub fn node_size(base_symbol_size: u32, logic_score: Option<f64>) -> f64 {
    let logic = logic_score.unwrap_or(DEFAULT_LOGIC_SCORE);
    let size = f64::from(base_symbol_size) * (0.8 + logic);
    (size * 100.0).round() / 100.0
}

/// Cut a label for display, appending "..." if truncated.
pub fn label_for(text: &str, detailed: bool) -> String {
    let max_chars = if detailed {
        DETAILED_LABEL_CHARS
    } else {
        COMPACT_LABEL_CHARS
    };
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((end, _)) => format!("{}...", &text[..end]),
    }
}
