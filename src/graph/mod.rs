//! Similarity graph construction.
//!
//! [`build_graph`] turns an ordered list of [`MeaningNode`]s into a node list
//! with size hints and an edge list with tiers and line styles. Only the
//! most recent [`DEFAULT_WINDOW`] nodes are compared pairwise; older nodes
//! are still emitted so the renderer can place them, but never get edges.
//!
//! The builder is pure: no I/O, no shared state, no randomness. The same
//! input always produces the same output.

pub mod score;
pub mod style;
pub mod summary;

use serde::Serialize;

use crate::node::MeaningNode;
pub use score::Tier;
pub use style::EdgeStyle;

/// Number of most recent nodes eligible for pairwise comparison.
pub const DEFAULT_WINDOW: usize = 30;
/// Weight applied to the cosine similarity term.
pub const VECTOR_WEIGHT: f64 = 0.6;
/// Flat bonus for sharing at least one keyword.
pub const KEYWORD_BONUS: f64 = 0.4;
/// Scores above this are strong edges.
pub const STRONG_THRESHOLD: f64 = 0.75;
/// Scores above this (and not strong) are weak edges.
pub const WEAK_THRESHOLD: f64 = 0.55;

/// Scoring knobs. `Default` gives the tuned constants above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphParams {
    pub window: usize,
    pub vector_weight: f64,
    pub keyword_bonus: f64,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            vector_weight: VECTOR_WEIGHT,
            keyword_bonus: KEYWORD_BONUS,
            strong_threshold: STRONG_THRESHOLD,
            weak_threshold: WEAK_THRESHOLD,
        }
    }
}

/// Caller-side display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Base node size; larger in fullscreen.
    pub base_symbol_size: u32,
    /// Long labels instead of compact ones.
    pub detailed_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_symbol_size: 20,
            detailed_labels: false,
        }
    }
}

/// A node as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub size: f64,
}

/// An undirected edge. `source` precedes `target` in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEdge {
    pub source: String,
    pub target: String,
    pub score: f64,
    pub tier: Tier,
    pub style: EdgeStyle,
}

/// Builder output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    /// Number of nodes that took part in pairwise scoring.
    pub window: usize,
    /// Pair comparisons performed: `window * (window - 1) / 2`.
    pub comparisons: usize,
}

impl GraphView {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Index of the first node inside the comparison window.
pub fn window_start(total: usize, window: usize) -> usize {
    total.saturating_sub(window)
}

/// Build the graph with the default scoring constants.
pub fn build_graph(nodes: &[MeaningNode], render: &RenderOptions) -> GraphView {
    build_graph_with(nodes, &GraphParams::default(), render)
}

/// Build the graph with explicit scoring parameters.
pub fn build_graph_with(
    nodes: &[MeaningNode],
    params: &GraphParams,
    render: &RenderOptions,
) -> GraphView {
    let view_nodes: Vec<ViewNode> = nodes
        .iter()
        .map(|n| ViewNode {
            id: n.id.clone(),
            label: style::label_for(n.display_text(), render.detailed_labels),
            size: style::node_size(render.base_symbol_size, n.logic_score),
        })
        .collect();

    let start = window_start(nodes.len(), params.window);
    let recent = &nodes[start..];

    let mut edges = Vec::new();
    let mut comparisons = 0usize;
    for (i, a) in recent.iter().enumerate() {
        for b in &recent[i + 1..] {
            comparisons += 1;
            let score = score::score_pair(a, b, params);
            if let Some(tier) = Tier::from_score(score, params) {
                edges.push(ViewEdge {
                    source: a.id.clone(),
                    target: b.id.clone(),
                    score,
                    tier,
                    style: EdgeStyle::for_tier(tier),
                });
            }
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        window = recent.len(),
        comparisons,
        edges = edges.len(),
        "similarity graph built"
    );

    GraphView {
        nodes: view_nodes,
        edges,
        window: recent.len(),
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spike(i: usize) -> Vec<f32> {
        let mut v = vec![0.0f32; 8];
        v[i % 8] = 1.0;
        v
    }

    #[test]
    fn test_empty_input() {
        let view = build_graph(&[], &RenderOptions::default());
        assert!(view.is_empty());
        assert!(view.edges.is_empty());
        assert_eq!(view.window, 0);
        assert_eq!(view.comparisons, 0);
    }

    #[test]
    fn test_single_node_has_no_edges() {
        let nodes = vec![MeaningNode::new("a", "alone").with_vector(spike(0))];
        let view = build_graph(&nodes, &RenderOptions::default());
        assert_eq!(view.nodes.len(), 1);
        assert!(view.edges.is_empty());
        assert_eq!(view.comparisons, 0);
    }

    #[test]
    fn test_window_start_clamp() {
        assert_eq!(window_start(0, 30), 0);
        assert_eq!(window_start(10, 30), 0);
        assert_eq!(window_start(30, 30), 0);
        assert_eq!(window_start(35, 30), 5);
    }

    #[test]
    fn test_identical_pair_is_strong() {
        let nodes = vec![
            MeaningNode::new("a", "rest").with_vector(spike(1)).with_keywords(["rest"]),
            MeaningNode::new("b", "rest").with_vector(spike(1)).with_keywords(["rest"]),
        ];
        let view = build_graph(&nodes, &RenderOptions::default());
        assert_eq!(view.edges.len(), 1);
        let edge = &view.edges[0];
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("a", "b"));
        assert_eq!(edge.tier, Tier::Strong);
        assert!(edge.score >= 1.0);
        assert_eq!(edge.style, EdgeStyle::for_tier(Tier::Strong));
    }

    #[test]
    fn test_keyword_only_pair_gets_no_edge() {
        // 0.4 alone stays under the weak threshold
        let nodes = vec![
            MeaningNode::new("a", "").with_keywords(["work"]),
            MeaningNode::new("b", "").with_keywords(["work"]),
        ];
        let view = build_graph(&nodes, &RenderOptions::default());
        assert!(view.edges.is_empty());
    }

    #[test]
    fn test_weak_tier_edge() {
        // identical vectors without keywords: 0.6
        let nodes = vec![
            MeaningNode::new("a", "").with_vector(spike(2)),
            MeaningNode::new("b", "").with_vector(spike(2)),
        ];
        let view = build_graph(&nodes, &RenderOptions::default());
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.edges[0].tier, Tier::Weak);
    }

    #[test]
    fn test_labels_and_sizes() {
        let nodes = vec![
            MeaningNode::new("a", "A long reflection about weekends")
                .with_care_point("weekends")
                .with_logic_score(0.2),
            MeaningNode::new("b", "Evening walks"),
        ];
        let view = build_graph(
            &nodes,
            &RenderOptions {
                base_symbol_size: 30,
                detailed_labels: true,
            },
        );
        assert_eq!(view.nodes[0].label, "weekends");
        assert_eq!(view.nodes[0].size, 30.0);
        assert_eq!(view.nodes[1].label, "Evening walks");
        assert_eq!(view.nodes[1].size, 39.0);
    }

    #[test]
    fn test_custom_window() {
        let nodes: Vec<MeaningNode> = (0..6)
            .map(|i| MeaningNode::new(format!("n{i}"), "").with_vector(spike(0)))
            .collect();
        let params = GraphParams {
            window: 3,
            ..GraphParams::default()
        };
        let view = build_graph_with(&nodes, &params, &RenderOptions::default());
        assert_eq!(view.window, 3);
        assert_eq!(view.comparisons, 3);
        assert!(view
            .edges
            .iter()
            .all(|e| ["n3", "n4", "n5"].contains(&e.source.as_str())));
    }
}
