pub mod export;
pub mod graph;
pub mod import;
pub mod stats;

use anyhow::Result;

use crate::config::MeaningGraphConfig;

/// Soft-delete a node so it no longer appears in graphs.
pub fn forget(config: &MeaningGraphConfig, id: &str) -> Result<()> {
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    crate::node::store::forget_node(&conn, id)?;
    println!("Forgot node {id}.");
    Ok(())
}
