//! CLI `graph` command — build the similarity graph and print it as JSON.

use anyhow::Result;

use crate::config::MeaningGraphConfig;

/// Build the graph for `owner` and write it to stdout.
pub fn graph(
    config: &MeaningGraphConfig,
    owner: Option<&str>,
    fullscreen: bool,
    detailed: Option<bool>,
    pretty: bool,
) -> Result<()> {
    let owner = config.owner_or_default(owner);
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let nodes = crate::node::store::load_nodes(&conn, owner)?;
    let render = config.render.options(fullscreen, detailed);
    let view = crate::graph::build_graph_with(&nodes, &config.graph.params(), &render);

    let json = if pretty {
        serde_json::to_string_pretty(&view)?
    } else {
        serde_json::to_string(&view)?
    };
    println!("{json}");

    eprintln!(
        "Built graph for {owner}: {} nodes, {} edges.",
        view.nodes.len(),
        view.edges.len()
    );
    Ok(())
}
