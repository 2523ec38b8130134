use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::CollectError;
use super::scanner::FileScanner;
use super::table::FileTable;
use crate::remote::{fetch_with_retry, RemoteOutcome, RepositoryLoader, RetryPolicy};

/// Where one project's source may come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSource {
    pub repo_url: Option<String>,
    pub token: Option<String>,
    pub local_root: Option<PathBuf>,
}

impl ProjectSource {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: Some(root.into()),
            ..Self::default()
        }
    }

    pub fn remote(repo_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            repo_url: Some(repo_url.into()),
            token,
            local_root: None,
        }
    }

    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
}

/// Files gathered for one build, plus any downgraded failure
#[derive(Debug)]
pub struct Collected {
    pub table: FileTable,
    pub origin: Origin,
    pub warning: Option<String>,
}

/// Gathers a project's files: remote snapshot first, local walk on failure
pub struct SourceCollector {
    loader: Arc<dyn RepositoryLoader>,
    retry: RetryPolicy,
    scanner: Arc<FileScanner>,
}

impl SourceCollector {
    pub fn new(loader: Arc<dyn RepositoryLoader>, retry: RetryPolicy) -> Self {
        Self {
            loader,
            retry,
            scanner: Arc::new(FileScanner::new()),
        }
    }

    pub async fn collect(&self, source: &ProjectSource) -> Result<Collected, CollectError> {
        let mut warning = None;
        let mut remote_failure = None;

        if let Some(repo_url) = source.repo_url.as_deref() {
            let outcome =
                fetch_with_retry(self.loader.as_ref(), repo_url, source.token.as_deref(), &self.retry)
                    .await;
            warning = outcome.fallback_warning();
            match outcome {
                RemoteOutcome::Loaded(snapshot) => {
                    let warning = snapshot.warning();
                    return Ok(Collected {
                        table: snapshot.files.into_iter().collect(),
                        origin: Origin::Remote,
                        warning,
                    });
                }
                RemoteOutcome::Abandoned { error, .. } | RemoteOutcome::Exhausted { error, .. } => {
                    remote_failure = Some(error.to_string());
                }
            }
        }

        let root = match source.local_root.as_ref() {
            Some(root) if root.is_dir() => root.clone(),
            other => {
                let mut detail = match other {
                    Some(root) => format!("no local source at {}", root.display()),
                    None => "no local source configured".to_string(),
                };
                if let Some(remote) = remote_failure {
                    detail = format!("remote fetch failed ({remote}) and {detail}");
                }
                warn!("{}", detail);
                return Err(CollectError::NotFound(detail));
            }
        };

        info!("Scanning local source at {}", root.display());
        let scanner = Arc::clone(&self.scanner);
        let table = tokio::task::spawn_blocking(move || scanner.scan_table(&root))
            .await?
            .map_err(CollectError::Scan)?;
        info!(files = table.len(), "local scan complete");

        Ok(Collected {
            table,
            origin: Origin::Local,
            warning,
        })
    }
}
