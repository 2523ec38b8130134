use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use std::io::Read;
use tar::Archive;
use tracing::debug;

use super::{LoadError, RemoteSnapshot, RepositoryLoader};
use crate::core::scanner::is_excluded;
use crate::core::SourceFile;
use crate::parsers::script_extension;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const JSON_ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("repograph/", env!("CARGO_PKG_VERSION"));

/// Loads a repository snapshot through the GitHub REST API.
///
/// The default branch is downloaded as one gzipped tarball, so a load costs
/// a single API request however many files the repository has.
#[derive(Debug, Clone)]
pub struct GitHubLoader {
    client: Client,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHubLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at a GitHub Enterprise (or mock) API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// `<api base>/<segments>`, each segment percent-encoded
    pub fn api_url(&self, segments: &[&str]) -> Result<Url, LoadError> {
        let invalid = || LoadError::InvalidUrl(self.api_base.clone());
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, url: Url, token: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, JSON_ACCEPT);
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl Default for GitHubLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryLoader for GitHubLoader {
    async fn load(&self, repo_url: &str, token: Option<&str>) -> Result<RemoteSnapshot, LoadError> {
        let (owner, repo) = parse_repo_url(repo_url)?;
        let url = self.api_url(&["repos", owner.as_str(), repo.as_str(), "tarball"])?;
        debug!(owner = %owner, repo = %repo, %url, "downloading repository tarball");

        let archive = check(self.get(url, token).send().await?).await?.bytes().await?;
        debug!(owner = %owner, repo = %repo, bytes = archive.len(), "downloaded repository tarball");

        tokio::task::spawn_blocking(move || unpack_snapshot(&archive))
            .await
            .map_err(|err| LoadError::Other(format!("archive extraction panicked: {err}")))?
    }
}

/// Read the script files out of a gzipped repository tarball.
///
/// GitHub wraps the tree in a single `<owner>-<repo>-<sha>/` directory;
/// that first component is dropped from every key. Files that are not
/// UTF-8 are left out and reported in the snapshot's warnings.
pub fn unpack_snapshot(archive: &[u8]) -> Result<RemoteSnapshot, LoadError> {
    let mut snapshot = RemoteSnapshot::default();
    let mut skipped = Vec::new();

    let mut archive = Archive::new(GzDecoder::new(archive));
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path()?.to_string_lossy().replace('\\', "/");
        let Some((_, relative)) = path.split_once('/') else {
            continue;
        };
        if script_extension(relative).is_none() || is_excluded(relative) {
            continue;
        }

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        match String::from_utf8(bytes) {
            Ok(content) => snapshot.files.push(SourceFile::new(relative, content)),
            Err(_) => {
                debug!(path = relative, "skipping non-UTF-8 remote file");
                skipped.push(relative.to_string());
            }
        }
    }

    if !skipped.is_empty() {
        snapshot.warnings.push(format!(
            "{} remote file(s) skipped as non-UTF-8: {}",
            skipped.len(),
            skipped.join(", ")
        ));
    }
    Ok(snapshot)
}

/// Turn a non-success response into a classified [`LoadError`]
async fn check(response: Response) -> Result<Response, LoadError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&message) {
        message = body.message;
    }
    Err(LoadError::Status {
        status: status.as_u16(),
        message,
    })
}

/// `https://github.com/<owner>/<repo>[.git][/...]` -> `(owner, repo)`
pub fn parse_repo_url(repo_url: &str) -> Result<(String, String), LoadError> {
    let invalid = || LoadError::InvalidUrl(repo_url.to_string());

    let rest = repo_url
        .trim()
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(repo_url.trim());
    let mut segments = rest.split('/').skip(1).filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments.next().ok_or_else(invalid)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(invalid());
    }

    Ok((owner.to_string(), repo.to_string()))
}
