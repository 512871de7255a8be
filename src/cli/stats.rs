use anyhow::Result;

use crate::config::MeaningGraphConfig;
use crate::graph::summary::summarize;

/// Display node and graph statistics in the terminal.
pub fn stats(config: &MeaningGraphConfig, owner: Option<&str>) -> Result<()> {
    let owner = config.owner_or_default(owner);
    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;

    let counts = crate::node::store::count_nodes(&conn, owner)?;
    let nodes = crate::node::store::load_nodes(&conn, owner)?;
    let render = config.render.options(false, None);
    let view = crate::graph::build_graph_with(&nodes, &config.graph.params(), &render);
    let summary = summarize(&view);

    let with_vector = nodes.iter().filter(|n| n.vector.is_some()).count();
    let with_keywords = nodes.iter().filter(|n| !n.keywords.is_empty()).count();

    println!("Graph Statistics ({owner})");
    println!("{}", "=".repeat(40));
    println!("  Active nodes:        {}", counts.active);
    println!("  Forgotten nodes:     {}", counts.deleted);
    println!("  With vector:         {with_vector}");
    println!("  With keywords:       {with_keywords}");
    println!();

    println!("Similarity:");
    println!("  Window:              {}", summary.window);
    println!("  Comparisons:         {}", summary.comparisons);
    println!("  Strong edges:        {}", summary.strong_edges);
    println!("  Weak edges:          {}", summary.weak_edges);
    println!("  Isolated nodes:      {}", summary.isolated_nodes);

    if let Some(ref id) = summary.most_connected {
        println!("  Most connected:      {id} ({} edges)", summary.max_degree);
    }

    Ok(())
}
