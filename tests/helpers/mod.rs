#![allow(dead_code)]

use meaning_graph::db;
use meaning_graph::node::store::{insert_node, NewNode};
use meaning_graph::node::MeaningNode;
use rusqlite::Connection;

/// Open a fresh in-memory database with schema applied.
pub fn test_db() -> Connection {
    db::open_memory_database().unwrap()
}

/// Deterministic 16-dim vector with a spike at `seed`. Distinct seeds are orthogonal.
pub fn test_vector(seed: usize) -> Vec<f32> {
    let mut v = vec![0.0f32; 16];
    v[seed % 16] = 1.0;
    v
}

/// Two-dim unit vector whose cosine with `[1, 0]` is `c`.
pub fn vector_at_cosine(c: f64) -> Vec<f32> {
    vec![c as f32, (1.0 - c * c).sqrt() as f32]
}

/// `n` nodes that are all identical, so every compared pair is strong.
pub fn identical_nodes(n: usize) -> Vec<MeaningNode> {
    (0..n)
        .map(|i| {
            MeaningNode::new(format!("n{i:02}"), format!("reflection {i}"))
                .with_vector(test_vector(0))
                .with_keywords(["calm"])
        })
        .collect()
}

/// Insert a node for `owner` at day `day` of January 2026. Returns the ID.
pub fn insert_at(conn: &Connection, owner: &str, day: u32, node: NewNode) -> String {
    let node = NewNode {
        created_at: Some(format!("2026-01-{day:02}T00:00:00Z")),
        ..node
    };
    insert_node(conn, owner, &node).unwrap()
}
