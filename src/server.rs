//! HTTP endpoint that serves built graphs to the renderer.
//!
//! `GET /graph?owner=&fullscreen=&detailed=` loads the owner's active nodes,
//! builds the similarity graph and returns it as JSON.

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::config::MeaningGraphConfig;
use crate::graph::{self, GraphView};
use crate::node::store;

pub struct AppState {
    pub db: Mutex<rusqlite::Connection>,
    pub config: MeaningGraphConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    pub owner: Option<String>,
    #[serde(default)]
    pub fullscreen: bool,
    /// Overrides `render.detailed_labels` when present.
    #[serde(default)]
    pub detailed: Option<bool>,
}

/// Handler error, rendered as `{ "error": ... }`.
#[derive(Debug)]
pub enum AppError {
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")),
        };
        tracing::error!(%status, error = %message, "request failed");
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/graph", get(graph_handler))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn graph_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<GraphView>, AppError> {
    let owner = state.config.owner_or_default(query.owner.as_deref()).to_string();

    let nodes = {
        let conn = state
            .db
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))?;
        store::load_nodes(&conn, &owner)?
    };

    let render = state.config.render.options(query.fullscreen, query.detailed);
    let view = graph::build_graph_with(&nodes, &state.config.graph.params(), &render);
    Ok(Json(view))
}

/// Open the database and serve until ctrl-c.
pub async fn serve(config: MeaningGraphConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let db_path = config.resolved_db_path();
    let conn = crate::db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let state = Arc::new(AppState {
        db: Mutex::new(conn),
        config,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "graph server listening at http://{bind_addr}/graph");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down graph server");
        })
        .await?;

    Ok(())
}
