use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

use super::export::ExportData;
use crate::config::MeaningGraphConfig;
use crate::node::store::{self, NewNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub imported: u64,
    /// Nodes whose ID already existed.
    pub skipped: u64,
}

/// Parse an export file. `owner` in the file is ignored in favour of the
/// command line.
pub fn parse_import(json: &str) -> Result<Vec<NewNode>> {
    let data: ExportData = serde_json::from_str(json).context("failed to parse import JSON")?;
    Ok(data.nodes)
}

/// Insert `nodes` for `owner` in one transaction. Skips nodes whose ID
/// already exists; any other failure rolls the whole import back.
pub fn import_nodes(
    conn: &mut Connection,
    owner: &str,
    nodes: &[NewNode],
) -> Result<ImportResult> {
    let tx = conn.transaction()?;

    let mut result = ImportResult {
        imported: 0,
        skipped: 0,
    };
    for (index, node) in nodes.iter().enumerate() {
        if let Some(ref id) = node.id {
            if store::node_exists(&tx, id)? {
                result.skipped += 1;
                continue;
            }
        }
        store::insert_node(&tx, owner, node)
            .with_context(|| format!("failed to import node #{index}"))?;
        result.imported += 1;
    }

    tx.commit()?;
    tracing::info!(
        owner,
        imported = result.imported,
        skipped = result.skipped,
        "import committed"
    );
    Ok(result)
}

/// Import nodes from a JSON file.
pub fn import(config: &MeaningGraphConfig, file: &Path, owner: Option<&str>) -> Result<()> {
    let owner = config.owner_or_default(owner);
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;
    let nodes = parse_import(&json)?;

    let db_path = config.resolved_db_path();
    let mut conn = crate::db::open_database(&db_path)?;

    println!("Importing {} nodes for {owner}...", nodes.len());
    let result = import_nodes(&mut conn, owner, &nodes)?;

    println!("Import complete:");
    println!("  Nodes imported: {}", result.imported);
    println!("  Nodes skipped:  {} (already exist)", result.skipped);
    Ok(())
}
