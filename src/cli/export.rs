use anyhow::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config::MeaningGraphConfig;
use crate::node::decode::decode_node;
use crate::node::store::NewNode;

/// Export format — typed nodes, oldest first. `import` reads the same shape.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub owner: String,
    pub nodes: Vec<NewNode>,
}

/// Collect the active nodes of `owner` for export.
///
/// Vectors and keywords go through the same lenient decoding as graph
/// building, so malformed blobs are exported as absent.
pub fn export_nodes(conn: &Connection, owner: &str) -> Result<ExportData> {
    let rows = crate::node::store::load_stored(conn, owner, false)?;
    let nodes = rows
        .iter()
        .map(|row| {
            let node = decode_node(row);
            NewNode {
                id: Some(node.id),
                content: node.content,
                care_point: node.care_point,
                vector: node.vector,
                keywords: node.keywords,
                logic_score: node.logic_score,
                created_at: Some(row.created_at.clone()),
            }
        })
        .collect();

    Ok(ExportData {
        owner: owner.to_string(),
        nodes,
    })
}

/// Export all active nodes of `owner` as JSON to stdout.
pub fn export(config: &MeaningGraphConfig, owner: Option<&str>) -> Result<()> {
    let owner = config.owner_or_default(owner);
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let data = export_nodes(&conn, owner)?;

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} nodes.", data.nodes.len());
    Ok(())
}
