use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::{FailureKind, LoadError, RemoteSnapshot, RepositoryLoader};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Exponential backoff: the wait after attempt `n` (from 0) is
/// `base_delay * 2^n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

/// Final state of a remote fetch
#[derive(Debug)]
pub enum RemoteOutcome {
    Loaded(RemoteSnapshot),
    /// Stopped without exhausting attempts; retrying could not help
    Abandoned { kind: FailureKind, error: LoadError },
    Exhausted { attempts: u32, error: LoadError },
}

impl RemoteOutcome {
    /// Warning shown to the caller when the collector falls back to local
    /// source after this outcome
    pub fn fallback_warning(&self) -> Option<String> {
        match self {
            RemoteOutcome::Loaded(_) => None,
            RemoteOutcome::Abandoned {
                kind: FailureKind::Auth,
                error,
            } => Some(format!(
                "remote authentication failed ({error}); showing local source instead"
            )),
            RemoteOutcome::Abandoned {
                kind: FailureKind::RateLimit,
                error,
            } => Some(format!(
                "remote rate limit reached without an access token ({error}); showing local source instead"
            )),
            RemoteOutcome::Abandoned {
                kind: FailureKind::Permanent,
                error,
            } => Some(format!(
                "remote repository unusable ({error}); showing local source instead"
            )),
            RemoteOutcome::Abandoned { error, .. } => Some(format!(
                "remote fetch abandoned ({error}); showing local source instead"
            )),
            RemoteOutcome::Exhausted { attempts, error } => Some(format!(
                "remote fetch failed after {attempts} attempts ({error}); showing local source instead"
            )),
        }
    }
}

/// Fetch through `loader`, retrying transient failures.
///
/// Auth and permanent failures stop immediately. Rate limits stop
/// immediately when no token was supplied; with a token they are retried
/// like any transient failure.
pub async fn fetch_with_retry(
    loader: &dyn RepositoryLoader,
    repo_url: &str,
    token: Option<&str>,
    policy: &RetryPolicy,
) -> RemoteOutcome {
    let mut attempt = 0;

    loop {
        let error = match loader.load(repo_url, token).await {
            Ok(snapshot) => {
                info!(
                    repo_url,
                    attempt = attempt + 1,
                    files = snapshot.files.len(),
                    "remote fetch succeeded"
                );
                return RemoteOutcome::Loaded(snapshot);
            }
            Err(error) => error,
        };

        let kind = FailureKind::of(&error);
        match kind {
            FailureKind::Auth => {
                warn!(repo_url, %error, "remote authentication failed, not retrying");
                return RemoteOutcome::Abandoned { kind, error };
            }
            FailureKind::Permanent => {
                warn!(repo_url, %error, "remote fetch cannot succeed, not retrying");
                return RemoteOutcome::Abandoned { kind, error };
            }
            FailureKind::RateLimit if token.is_none() => {
                warn!(repo_url, %error, "remote rate limit without token, not retrying");
                return RemoteOutcome::Abandoned { kind, error };
            }
            FailureKind::RateLimit | FailureKind::Transient => {}
        }

        if attempt + 1 >= policy.max_attempts {
            warn!(
                repo_url,
                %error,
                attempts = policy.max_attempts,
                "remote fetch exhausted retry attempts"
            );
            return RemoteOutcome::Exhausted {
                attempts: policy.max_attempts,
                error,
            };
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "Remote fetch failed (attempt {}/{}), retrying in {:?}: {}",
            attempt + 1,
            policy.max_attempts,
            delay,
            error
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
