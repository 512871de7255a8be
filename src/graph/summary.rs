use serde::Serialize;
use std::collections::HashMap;

use super::{GraphView, Tier};

/// Aggregate counts over a built graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub total_nodes: usize,
    pub window: usize,
    pub comparisons: usize,
    pub strong_edges: usize,
    pub weak_edges: usize,
    /// Nodes that appear in no edge, including everything outside the window.
    pub isolated_nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_connected: Option<String>,
    pub max_degree: usize,
}

/// Summarize a graph. Degree ties go to the earlier node.
pub fn summarize(view: &GraphView) -> GraphSummary {
    let mut degree: HashMap<&str, usize> = HashMap::new();
    let mut strong_edges = 0;
    let mut weak_edges = 0;

    for edge in &view.edges {
        match edge.tier {
            Tier::Strong => strong_edges += 1,
            Tier::Weak => weak_edges += 1,
        }
        *degree.entry(edge.source.as_str()).or_default() += 1;
        *degree.entry(edge.target.as_str()).or_default() += 1;
    }

    let mut most_connected = None;
    let mut max_degree = 0;
    for node in &view.nodes {
        let d = degree.get(node.id.as_str()).copied().unwrap_or(0);
        if d > max_degree {
            max_degree = d;
            most_connected = Some(node.id.clone());
        }
    }

    let isolated_nodes = view
        .nodes
        .iter()
        .filter(|n| !degree.contains_key(n.id.as_str()))
        .count();

    GraphSummary {
        total_nodes: view.nodes.len(),
        window: view.window,
        comparisons: view.comparisons,
        strong_edges,
        weak_edges,
        isolated_nodes,
        most_connected,
        max_degree,
    }
}
