//! Node persistence: insert, load in creation order, soft delete.
//!
//! The graph builder treats input order as recency, so [`load_nodes`] always
//! returns rows oldest first.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::decode::{decode_node, encode_keywords, encode_vector};
use super::types::{MeaningNode, StoredNode};

/// A node to be written. `id` and `created_at` are generated when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNode {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub care_point: Option<String>,
    #[serde(default)]
    pub vector: Option<Vec<f32>>,
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub logic_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Active and soft-deleted row counts for one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeCounts {
    pub active: u64,
    pub deleted: u64,
}

/// Insert a node for `owner`. Returns the node ID.
pub fn insert_node(conn: &Connection, owner: &str, node: &NewNode) -> Result<String> {
    let id = node
        .id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
    let created_at = match node.created_at.as_deref() {
        Some(raw) => normalize_timestamp(raw)?,
        None => format_timestamp(Utc::now()),
    };

    if node_exists(conn, &id)? {
        bail!("node already exists: {id}");
    }

    insert_stored(
        conn,
        &StoredNode {
            id: id.clone(),
            owner: owner.to_string(),
            content: node.content.clone(),
            care_point: node.care_point.clone(),
            vector: node.vector.as_deref().map(encode_vector),
            keywords: (!node.keywords.is_empty()).then(|| encode_keywords(&node.keywords)),
            logic_score: node.logic_score,
            is_deleted: false,
            created_at,
        },
    )?;

    Ok(id)
}

/// Canonical stored form: UTC, microseconds, `Z` suffix. Rows sort by this
/// text, so every write must go through it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 timestamp with any offset into the canonical form.
pub fn normalize_timestamp(raw: &str) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim())
        .with_context(|| format!("invalid created_at timestamp: {raw:?}"))?;
    Ok(format_timestamp(parsed.with_timezone(&Utc)))
}

/// Insert a row with its blobs exactly as given. `created_at` is normalized.
pub fn insert_stored(conn: &Connection, node: &StoredNode) -> Result<()> {
    let created_at = normalize_timestamp(&node.created_at)?;
    conn.execute(
        "INSERT INTO meaning_nodes \
         (id, owner, content, care_point, vector, keywords, logic_score, is_deleted, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            node.id,
            node.owner,
            node.content,
            node.care_point,
            node.vector,
            node.keywords,
            node.logic_score,
            node.is_deleted,
            created_at,
        ],
    )?;
    Ok(())
}

/// Fetch the raw rows for `owner`, oldest first. Soft-deleted rows are
/// skipped unless `include_deleted` is set.
pub fn load_stored(
    conn: &Connection,
    owner: &str,
    include_deleted: bool,
) -> Result<Vec<StoredNode>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, content, care_point, vector, keywords, logic_score, is_deleted, created_at \
         FROM meaning_nodes \
         WHERE owner = ?1 AND (?2 OR is_deleted = 0) \
         ORDER BY created_at, rowid",
    )?;

    let rows = stmt
        .query_map(params![owner, include_deleted], |row| {
            Ok(StoredNode {
                id: row.get(0)?,
                owner: row.get(1)?,
                content: row.get(2)?,
                care_point: row.get(3)?,
                vector: row.get(4)?,
                keywords: row.get(5)?,
                logic_score: row.get(6)?,
                is_deleted: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Load the active nodes for `owner`, oldest first, decoded for the graph
/// builder.
pub fn load_nodes(conn: &Connection, owner: &str) -> Result<Vec<MeaningNode>> {
    let rows = load_stored(conn, owner, false)?;
    tracing::debug!(owner, count = rows.len(), "loaded nodes");
    Ok(rows.iter().map(decode_node).collect())
}

/// Soft delete: set `is_deleted`. The row stays for export.
pub fn forget_node(conn: &Connection, id: &str) -> Result<()> {
    let changed = conn.execute(
        "UPDATE meaning_nodes SET is_deleted = 1 WHERE id = ?1",
        params![id],
    )?;
    if changed == 0 {
        bail!("node not found: {id}");
    }
    tracing::info!(node = id, "node forgotten");
    Ok(())
}

pub fn node_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM meaning_nodes WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn count_nodes(conn: &Connection, owner: &str) -> Result<NodeCounts> {
    let (active, deleted): (i64, i64) = conn.query_row(
        "SELECT \
           COALESCE(SUM(CASE WHEN is_deleted = 0 THEN 1 ELSE 0 END), 0), \
           COALESCE(SUM(CASE WHEN is_deleted = 1 THEN 1 ELSE 0 END), 0) \
         FROM meaning_nodes WHERE owner = ?1",
        params![owner],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(NodeCounts {
        active: active as u64,
        deleted: deleted as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn node(content: &str, created_at: &str) -> NewNode {
        NewNode {
            content: content.to_string(),
            created_at: Some(created_at.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_load_in_creation_order() {
        let conn = db::open_memory_database().unwrap();
        let late = insert_node(&conn, "alice", &node("later", "2026-02-01T00:00:00Z")).unwrap();
        let early = insert_node(&conn, "alice", &node("earlier", "2026-01-01T00:00:00Z")).unwrap();

        let nodes = load_nodes(&conn, "alice").unwrap();
        let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec![early.as_str(), late.as_str()]);
    }

    #[test]
    fn test_same_timestamp_keeps_insertion_order() {
        let conn = db::open_memory_database().unwrap();
        let ts = "2026-01-01T00:00:00Z";
        let a = insert_node(&conn, "alice", &node("a", ts)).unwrap();
        let b = insert_node(&conn, "alice", &node("b", ts)).unwrap();
        let c = insert_node(&conn, "alice", &node("c", ts)).unwrap();

        let ids: Vec<String> = load_nodes(&conn, "alice")
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_vector_and_keywords_survive_storage() {
        let conn = db::open_memory_database().unwrap();
        let new = NewNode {
            content: "Walks help me think".into(),
            care_point: Some("movement".into()),
            vector: Some(vec![0.25, -0.5, 1.0]),
            keywords: ["walk", "think"].iter().map(|s| s.to_string()).collect(),
            logic_score: Some(0.3),
            ..Default::default()
        };
        insert_node(&conn, "alice", &new).unwrap();

        let loaded = &load_nodes(&conn, "alice").unwrap()[0];
        assert_eq!(loaded.vector, Some(vec![0.25, -0.5, 1.0]));
        assert_eq!(loaded.keywords, new.keywords);
        assert_eq!(loaded.care_point.as_deref(), Some("movement"));
        assert_eq!(loaded.logic_score, Some(0.3));
    }

    #[test]
    fn test_mixed_offsets_sort_by_instant() {
        let conn = db::open_memory_database().unwrap();
        let later = insert_node(&conn, "alice", &node("later", "2026-01-01T05:00:00Z")).unwrap();
        // 01:00Z
        let earlier =
            insert_node(&conn, "alice", &node("earlier", "2026-01-01T10:00:00+09:00")).unwrap();
        let middle =
            insert_node(&conn, "alice", &node("middle", "2026-01-01T03:00:00.5+00:00")).unwrap();

        let ids: Vec<String> = load_nodes(&conn, "alice")
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![earlier, middle, later]);

        let stored = load_stored(&conn, "alice", false).unwrap();
        assert_eq!(stored[0].created_at, "2026-01-01T01:00:00.000000Z");
        assert_eq!(stored[1].created_at, "2026-01-01T03:00:00.500000Z");
    }

    #[test]
    fn test_invalid_timestamp_rejected() {
        let conn = db::open_memory_database().unwrap();
        let err = insert_node(&conn, "alice", &node("when?", "yesterday")).unwrap_err();
        assert!(err.to_string().contains("invalid created_at"));
        assert_eq!(count_nodes(&conn, "alice").unwrap().active, 0);
    }

    #[test]
    fn test_generated_timestamp_is_canonical() {
        let conn = db::open_memory_database().unwrap();
        let new = NewNode {
            content: "now".into(),
            ..Default::default()
        };
        insert_node(&conn, "alice", &new).unwrap();
        let stored = &load_stored(&conn, "alice", false).unwrap()[0];
        assert_eq!(normalize_timestamp(&stored.created_at).unwrap(), stored.created_at);
        assert!(stored.created_at.ends_with('Z'));
    }

    #[test]
    fn test_owner_filter() {
        let conn = db::open_memory_database().unwrap();
        insert_node(&conn, "alice", &node("mine", "2026-01-01T00:00:00Z")).unwrap();
        insert_node(&conn, "bob", &node("theirs", "2026-01-01T00:00:00Z")).unwrap();

        let nodes = load_nodes(&conn, "alice").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].content, "mine");
    }

    #[test]
    fn test_forget_hides_node() {
        let conn = db::open_memory_database().unwrap();
        let id = insert_node(&conn, "alice", &node("gone", "2026-01-01T00:00:00Z")).unwrap();
        insert_node(&conn, "alice", &node("kept", "2026-01-02T00:00:00Z")).unwrap();

        forget_node(&conn, &id).unwrap();

        let nodes = load_nodes(&conn, "alice").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].content, "kept");
        assert_eq!(load_stored(&conn, "alice", true).unwrap().len(), 2);
        assert_eq!(
            count_nodes(&conn, "alice").unwrap(),
            NodeCounts { active: 1, deleted: 1 }
        );
    }

    #[test]
    fn test_forget_missing_node_fails() {
        let conn = db::open_memory_database().unwrap();
        let err = forget_node(&conn, "nope").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let conn = db::open_memory_database().unwrap();
        let mut new = node("x", "2026-01-01T00:00:00Z");
        new.id = Some("fixed".into());
        insert_node(&conn, "alice", &new).unwrap();
        let err = insert_node(&conn, "alice", &new).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_count_nodes_empty_owner() {
        let conn = db::open_memory_database().unwrap();
        assert_eq!(
            count_nodes(&conn, "nobody").unwrap(),
            NodeCounts { active: 0, deleted: 0 }
        );
    }
}
