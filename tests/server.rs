use axum::extract::{Query, State};
use axum::http::StatusCode;
use repograph::config::RepographConfig;
use repograph::core::CodebaseAnalyzer;
use repograph::server::{create_router, get_graph, GraphQuery};
use std::fs;
use std::sync::Arc;

fn analyzer(config: RepographConfig) -> Arc<CodebaseAnalyzer> {
    Arc::new(CodebaseAnalyzer::new(config))
}

#[tokio::test]
async fn missing_project_id_returns_400() {
    let response = get_graph(
        State(analyzer(RepographConfig::default())),
        Query(GraphQuery::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_project_without_fallback_returns_404() {
    let mut config = RepographConfig::default();
    config.local_root = None;

    let response = get_graph(
        State(analyzer(config)),
        Query(GraphQuery {
            project_id: Some("ghost".to_string()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn local_project_returns_200() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("app");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("main.ts"), "import './util'").unwrap();
    fs::write(root.join("util.ts"), "").unwrap();

    let mut config = RepographConfig::default();
    config.local_root = Some(root);

    let response = get_graph(
        State(analyzer(config)),
        Query(GraphQuery {
            project_id: Some("local".to_string()),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn router_builds() {
    let _router = create_router(analyzer(RepographConfig::default()));
}
