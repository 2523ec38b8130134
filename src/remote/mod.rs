//! Remote repository loading.
//!
//! A [`RepositoryLoader`] turns a repository URL (plus an optional access
//! token) into source files. Failures carry enough signal (HTTP status and
//! message) for [`FailureKind::classify`] to decide whether retrying makes
//! sense.

pub mod github;
pub mod retry;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::SourceFile;

pub use github::GitHubLoader;
pub use retry::{fetch_with_retry, RemoteOutcome, RetryPolicy};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid repository url: {0}")]
    InvalidUrl(String),

    #[error("remote responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unreadable repository archive: {0}")]
    Archive(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LoadError {
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Status { status, .. } => Some(*status),
            LoadError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// How a failed fetch should be treated by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Auth,
    RateLimit,
    /// Fails identically on every attempt (bad configuration)
    Permanent,
    Transient,
}

impl FailureKind {
    /// Classify from the status code and message text the remote produced
    pub fn classify(status: Option<u16>, message: &str) -> FailureKind {
        let message = message.to_ascii_lowercase();

        if status == Some(401)
            || message.contains("bad credentials")
            || message.contains("requires authentication")
            || message.contains("unauthorized")
        {
            return FailureKind::Auth;
        }

        if status == Some(429)
            || message.contains("rate limit")
            || (status == Some(403) && message.contains("limit"))
        {
            return FailureKind::RateLimit;
        }

        FailureKind::Transient
    }

    pub fn of(error: &LoadError) -> FailureKind {
        match error {
            LoadError::InvalidUrl(_) => FailureKind::Permanent,
            _ => FailureKind::classify(error.status(), &error.to_string()),
        }
    }
}

/// Files of one remote snapshot, plus notes about anything left out of it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<String>,
}

impl RemoteSnapshot {
    pub fn warning(&self) -> Option<String> {
        (!self.warnings.is_empty()).then(|| self.warnings.join("; "))
    }
}

impl From<Vec<SourceFile>> for RemoteSnapshot {
    fn from(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            warnings: Vec::new(),
        }
    }
}

/// Source of repository snapshots
#[async_trait]
pub trait RepositoryLoader: Send + Sync {
    async fn load(&self, repo_url: &str, token: Option<&str>) -> Result<RemoteSnapshot, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_signals() {
        assert_eq!(FailureKind::classify(Some(401), ""), FailureKind::Auth);
        assert_eq!(
            FailureKind::classify(None, "Bad credentials"),
            FailureKind::Auth
        );
    }

    #[test]
    fn rate_limit_signals() {
        assert_eq!(FailureKind::classify(Some(429), ""), FailureKind::RateLimit);
        assert_eq!(
            FailureKind::classify(Some(403), "API rate limit exceeded for 1.2.3.4"),
            FailureKind::RateLimit
        );
    }

    #[test]
    fn everything_else_is_transient() {
        assert_eq!(FailureKind::classify(Some(502), "bad gateway"), FailureKind::Transient);
        assert_eq!(FailureKind::classify(None, "connection reset"), FailureKind::Transient);
        assert_eq!(FailureKind::classify(Some(403), "forbidden"), FailureKind::Transient);
    }

    #[test]
    fn invalid_url_is_permanent() {
        let error = LoadError::InvalidUrl("https://github.com/acme".to_string());
        assert_eq!(FailureKind::of(&error), FailureKind::Permanent);
    }

    #[test]
    fn snapshot_warnings_are_joined() {
        let mut snapshot = RemoteSnapshot::default();
        assert_eq!(snapshot.warning(), None);
        snapshot.warnings.push("a".into());
        snapshot.warnings.push("b".into());
        assert_eq!(snapshot.warning().as_deref(), Some("a; b"));
    }
}
