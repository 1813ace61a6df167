//! Where the README lives: a local file or a file in a GitHub repository.

use crate::error::{BadgeError, Result};
use crate::readme::{self, PatchOutcome};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update presence badge";

/// README text plus whatever the store needs to write it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeDocument {
    pub text: String,
    /// Blob SHA for GitHub, `None` for local files.
    pub revision: Option<String>,
}

pub trait ReadmeStore {
    /// Name of this store, for logging.
    fn name(&self) -> &'static str;

    fn fetch(&self) -> Result<ReadmeDocument>;

    fn commit(&self, previous: &ReadmeDocument, text: &str, message: &str) -> Result<()>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub outcome: PatchOutcome,
    pub changed: bool,
    pub committed: bool,
}

/// Fetch the README, put `badge` into it and write it back when it changed.
pub fn sync_readme(
    store: &dyn ReadmeStore,
    badge: &str,
    identifier: &str,
    message: &str,
    dry_run: bool,
) -> Result<SyncReport> {
    let document = store.fetch()?;
    let result = readme::patch(&document.text, badge, identifier);

    let committed = if !result.changed {
        tracing::warn!(store = store.name(), "README content is the same, nothing to commit");
        false
    } else if dry_run {
        tracing::info!(store = store.name(), "dry run, README changes not committed");
        false
    } else {
        store.commit(&document, &result.text, message)?;
        tracing::info!(store = store.name(), "README changes committed");
        true
    };

    Ok(SyncReport {
        outcome: result.outcome,
        changed: result.changed,
        committed,
    })
}

// ---------------------------------------------------------------------------
// LocalReadmeStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LocalReadmeStore {
    path: PathBuf,
}

impl LocalReadmeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReadmeStore for LocalReadmeStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn fetch(&self) -> Result<ReadmeDocument> {
        let bytes = std::fs::read(&self.path)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            BadgeError::MalformedReadme(format!("{} is not UTF-8: {e}", self.path.display()))
        })?;
        Ok(ReadmeDocument {
            text,
            revision: None,
        })
    }

    fn commit(&self, _previous: &ReadmeDocument, text: &str, _message: &str) -> Result<()> {
        crate::io::atomic_write(&self.path, text.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// GithubReadmeStore
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

/// README in a GitHub repository, read and written through the contents API.
#[derive(Clone)]
pub struct GithubReadmeStore {
    api_url: String,
    repo: String,
    path: String,
    branch: Option<String>,
    token: String,
    client: reqwest::blocking::Client,
}

impl GithubReadmeStore {
    pub fn new(
        api_url: impl Into<String>,
        repo: impl Into<String>,
        path: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            repo: repo.into(),
            path: path.into().trim_start_matches('/').to_string(),
            branch: None,
            token: token.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch;
        self
    }

    fn contents_url(&self) -> String {
        format!("{}/repos/{}/contents/{}", self.api_url, self.repo, self.path)
    }

    fn request(&self, method: reqwest::Method) -> reqwest::blocking::RequestBuilder {
        self.client
            .request(method, self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("presence-badge/", env!("CARGO_PKG_VERSION")))
    }
}

/// Decode the base64 body GitHub returns, which is wrapped at 60 columns.
pub fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| BadgeError::MalformedReadme(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| BadgeError::MalformedReadme(format!("README is not UTF-8: {e}")))
}

impl ReadmeStore for GithubReadmeStore {
    fn name(&self) -> &'static str {
        "github"
    }

    fn fetch(&self) -> Result<ReadmeDocument> {
        let mut request = self.request(reqwest::Method::GET);
        if let Some(branch) = &self.branch {
            request = request.query(&[("ref", branch)]);
        }
        tracing::info!(repo = %self.repo, path = %self.path, "fetching README");
        let response: ContentsResponse = request.send()?.error_for_status()?.json()?;
        let text = decode_content(&response.content)?;
        Ok(ReadmeDocument {
            text,
            revision: Some(response.sha),
        })
    }

    fn commit(&self, previous: &ReadmeDocument, text: &str, message: &str) -> Result<()> {
        let sha = previous.revision.as_deref().ok_or_else(|| {
            BadgeError::Http("cannot update a GitHub file without its blob sha".to_string())
        })?;
        let body = UpdateRequest {
            message,
            content: STANDARD.encode(text.as_bytes()),
            sha,
            branch: self.branch.as_deref(),
        };
        tracing::info!(repo = %self.repo, path = %self.path, "committing README");
        self.request(reqwest::Method::PUT)
            .json(&body)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
