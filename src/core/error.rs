use serde::Serialize;
use thiserror::Error;

/// Failure to produce any file table at all
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("project not found: {0}")]
    NotFound(String),

    #[error("local scan failed: {0:#}")]
    Scan(anyhow::Error),

    #[error("collector task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Request-level failures, each with a stable machine-readable kind
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0} required")]
    MissingParameter(&'static str),

    #[error("project not found: {0}")]
    NotFound(String),

    #[error("analysis failed: {0}")]
    Failed(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::MissingParameter(_) => "missing_parameter",
            AnalysisError::NotFound(_) => "not_found",
            AnalysisError::Failed(_) => "analysis_failed",
        }
    }

    /// Human-readable detail without the kind prefix
    pub fn details(&self) -> String {
        match self {
            AnalysisError::MissingParameter(name) => format!("{name} required"),
            AnalysisError::NotFound(detail) | AnalysisError::Failed(detail) => detail.clone(),
        }
    }

    pub fn describe(&self, include_trace: bool) -> ErrorDescriptor {
        ErrorDescriptor {
            error: self.kind().to_string(),
            details: self.details(),
            trace: include_trace.then(|| format!("{self:?}")),
        }
    }
}

impl From<CollectError> for AnalysisError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::NotFound(detail) => AnalysisError::NotFound(detail),
            other => AnalysisError::Failed(other.to_string()),
        }
    }
}

/// Failure body returned to callers
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub error: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(
            AnalysisError::MissingParameter("projectId").kind(),
            "missing_parameter"
        );
        assert_eq!(AnalysisError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(AnalysisError::Failed("x".into()).kind(), "analysis_failed");
    }

    #[test]
    fn trace_only_when_requested() {
        let err = AnalysisError::Failed("boom".into());
        assert!(err.describe(false).trace.is_none());
        assert!(err.describe(true).trace.is_some());
        assert_eq!(err.describe(false).details, "boom");
    }

    #[test]
    fn collect_not_found_maps_to_not_found() {
        let err: AnalysisError = CollectError::NotFound("gone".into()).into();
        assert_eq!(err.kind(), "not_found");
    }
}
