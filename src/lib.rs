//! Similarity graphs for meaning-journal nodes.
//!
//! A meaning node is one extracted insight from a reflection: its text, a
//! short care-point label, keyword tags, an embedding vector and a logic
//! score. This crate links recent nodes into a tiered similarity graph for
//! force-directed rendering.
//!
//! | Signal | Contribution |
//! |--------|--------------|
//! | Cosine similarity of vectors | `similarity * 0.6` |
//! | At least one shared keyword | flat `0.4` |
//!
//! Scores above 0.75 make a **strong** edge, scores above 0.55 a **weak**
//! one. Only the 30 most recent nodes are compared pairwise.
//!
//! # Modules
//!
//! - [`graph`] — the pure graph builder, pair scoring, styles and summaries
//! - [`node`] — node types, lenient blob decoding, and the SQLite node store
//! - [`db`] — database opening and schema
//! - [`config`] — configuration from TOML files and environment variables
//! - [`server`] — HTTP endpoint serving built graphs
//! - [`cli`] — terminal commands

pub mod cli;
pub mod config;
pub mod db;
pub mod graph;
pub mod node;
pub mod server;
