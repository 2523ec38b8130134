//! HTTP surface: `GET /api/graph?projectId=<id>` and `GET /api/health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::core::{AnalysisError, CodebaseAnalyzer};

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn create_router(analyzer: Arc<CodebaseAnalyzer>) -> Router {
    Router::new()
        .route("/api/graph", get(get_graph))
        .route("/api/health", get(health_check))
        .with_state(analyzer)
}

pub async fn serve(analyzer: Arc<CodebaseAnalyzer>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_router(analyzer)).await?;
    Ok(())
}

pub async fn get_graph(
    State(analyzer): State<Arc<CodebaseAnalyzer>>,
    Query(query): Query<GraphQuery>,
) -> Response {
    match analyzer.analyze(query.project_id.as_deref()).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => {
            error!(kind = err.kind(), "graph api error: {}", err);
            let body = err.describe(!analyzer.config().is_production());
            (status_for(&err), Json(body)).into_response()
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::MissingParameter(_) => StatusCode::BAD_REQUEST,
        AnalysisError::NotFound(_) => StatusCode::NOT_FOUND,
        AnalysisError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
