use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{GraphLimits, ProjectSource};
use crate::remote::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

pub const DEFAULT_CONFIG_FILE: &str = "repograph.toml";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level configuration, read from `repograph.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepographConfig {
    /// `production` hides error traces from callers
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Fallback root for projects without their own local source
    #[serde(default = "default_local_root")]
    pub local_root: Option<PathBuf>,
    #[serde(default)]
    pub limits: GraphLimits,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

/// A known project and where its source lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub id: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    /// Environment variable holding the access token
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default)]
    pub local_root: Option<PathBuf>,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_local_root() -> Option<PathBuf> {
    Some(PathBuf::from("."))
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl Default for RepographConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            local_root: default_local_root(),
            limits: GraphLimits::default(),
            retry: RetryConfig::default(),
            projects: Vec::new(),
        }
    }
}

impl RepographConfig {
    /// Load config from a TOML file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
        Ok(config)
    }

    /// Make relative roots relative to the config file's directory.
    /// `local_root = ""` disables the top-level fallback.
    fn resolve_paths(&mut self, base: &Path) {
        if self
            .local_root
            .as_ref()
            .is_some_and(|root| root.as_os_str().is_empty())
        {
            self.local_root = None;
        }
        if let Some(root) = self.local_root.as_mut() {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        for project in &mut self.projects {
            if let Some(root) = project.local_root.as_mut() {
                if root.is_relative() {
                    *root = base.join(&*root);
                }
            }
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }

    pub fn project(&self, id: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Where to look for a project's source. Unknown projects, and known
    /// ones without a local root, fall back to the top-level `local_root`.
    pub fn project_source(&self, id: &str) -> ProjectSource {
        match self.project(id) {
            Some(project) => ProjectSource {
                repo_url: project.repo_url.clone(),
                token: project.token(),
                local_root: project.local_root.clone().or_else(|| self.local_root.clone()),
            },
            None => ProjectSource {
                repo_url: None,
                token: None,
                local_root: self.local_root.clone(),
            },
        }
    }
}

impl ProjectConfig {
    /// Token from `token_env`, or `GITHUB_TOKEN` when unset; blank counts as absent
    pub fn token(&self) -> Option<String> {
        let var = self.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV);
        std::env::var(var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_graph_caps() {
        let config = RepographConfig::default();
        assert_eq!(config.limits.max_nodes, 200);
        assert_eq!(config.limits.max_edges, 400);
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert!(!config.is_production());
    }

    #[test]
    fn parses_projects_and_partial_tables() {
        let config: RepographConfig = toml::from_str(
            r#"
environment = "production"

[limits]
max_nodes = 50

[[projects]]
id = "demo"
repo_url = "https://github.com/acme/demo"
token_env = "REPOGRAPH_TEST_TOKEN_UNSET"
"#,
        )
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.limits.max_nodes, 50);
        assert_eq!(config.limits.max_edges, 400);
        assert_eq!(config.retry.base_delay_ms, 500);

        let source = config.project_source("demo");
        assert_eq!(source.repo_url.as_deref(), Some("https://github.com/acme/demo"));
        assert_eq!(source.token, None);
        assert_eq!(source.local_root, Some(PathBuf::from(".")));
    }

    #[test]
    fn unknown_project_uses_fallback_root() {
        let config = RepographConfig::default();
        let source = config.project_source("nope");
        assert_eq!(source.repo_url, None);
        assert_eq!(source.local_root, Some(PathBuf::from(".")));
    }
}
