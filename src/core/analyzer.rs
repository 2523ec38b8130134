use std::sync::Arc;
use tracing::{info, warn};

use super::collector::{ProjectSource, SourceCollector};
use super::error::AnalysisError;
use super::graph::{GraphBuilder, GraphLimits, GraphResult};
use super::table::FileTable;
use crate::config::RepographConfig;
use crate::remote::{GitHubLoader, RepositoryLoader};

/// Request-level entry point: project id in, bounded import graph out.
///
/// Holds no per-request state; concurrent calls are independent.
pub struct CodebaseAnalyzer {
    config: RepographConfig,
    collector: SourceCollector,
}

impl CodebaseAnalyzer {
    pub fn new(config: RepographConfig) -> Self {
        Self::with_loader(config, Arc::new(GitHubLoader::new()))
    }

    pub fn with_loader(config: RepographConfig, loader: Arc<dyn RepositoryLoader>) -> Self {
        let collector = SourceCollector::new(loader, config.retry_policy());
        Self { config, collector }
    }

    pub fn config(&self) -> &RepographConfig {
        &self.config
    }

    /// Analyze the project named by `project_id`
    pub async fn analyze(&self, project_id: Option<&str>) -> Result<GraphResult, AnalysisError> {
        let project_id = project_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AnalysisError::MissingParameter("projectId"))?;

        let source = self.config.project_source(project_id);
        self.analyze_source(project_id, &source).await
    }

    pub async fn analyze_source(
        &self,
        project_id: &str,
        source: &ProjectSource,
    ) -> Result<GraphResult, AnalysisError> {
        info!(project_id, "Collecting source files...");
        let collected = self.collector.collect(source).await?;
        info!(
            project_id,
            files = collected.table.len(),
            origin = ?collected.origin,
            "Building dependency graph..."
        );

        let limits = self.config.limits;
        let table = collected.table;
        let result = tokio::task::spawn_blocking(move || build_graph(&table, limits))
            .await
            .map_err(|err| {
                warn!(project_id, %err, "graph build task failed");
                AnalysisError::Failed(err.to_string())
            })?;

        info!(
            project_id,
            nodes = result.total.nodes,
            edges = result.total.edges,
            "Analysis complete"
        );
        Ok(result.with_warning(collected.warning))
    }
}

/// Build a graph from an already collected table
pub fn build_graph(table: &FileTable, limits: GraphLimits) -> GraphResult {
    GraphBuilder::from_table(table, limits)
}
