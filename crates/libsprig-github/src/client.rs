//! Typed client for the git-data endpoints of one repository
//!
//! Every operation is a single request: no retries, no caching. Failures are
//! classified into [`HostError`] and surfaced to the caller, which aborts the
//! iteration in progress.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use libsprig_core::Config;

use crate::error::HostError;
use crate::models::{
    BranchRef, CommitInfo, CreatedObject, FileContents, NewCommit, NewTree, UpdateRef,
};

/// Which call is being classified; reference updates treat 422 as a
/// non-fast-forward conflict rather than a validation failure
enum Call {
    Read,
    RefUpdate,
}

/// Client for one repository on the hosting service
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_root: String,
    owner: String,
    repo: String,
    token: String,
}

impl GitHubClient {
    /// Build a client from the daemon configuration
    pub fn new(config: &Config) -> Result<Self, HostError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("sprigd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_root: config.github_api.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            token: config.token.clone(),
        })
    }

    /// Current state of a branch reference
    pub async fn branch_ref(&self, branch: &str) -> Result<BranchRef, HostError> {
        let url = self.url(&format!("git/refs/heads/{branch}"));
        self.get_json(&url, &format!("branch {branch}")).await
    }

    /// Commit object by sha
    pub async fn commit(&self, sha: &str) -> Result<CommitInfo, HostError> {
        let url = self.url(&format!("git/commits/{sha}"));
        self.get_json(&url, &format!("commit {sha}")).await
    }

    /// Decoded text of the tracked file, read through the contents endpoint.
    /// This read is independent of the git-data tree and may lag behind an
    /// in-progress commit chain.
    pub async fn file_contents(&self, path: &str) -> Result<String, HostError> {
        let url = self.url(&format!("contents/{path}"));
        let contents: FileContents = self.get_json(&url, &format!("contents {path}")).await?;
        contents.decoded()
    }

    /// Create a tree replacing one file on top of `base_tree`; returns its sha
    pub async fn create_tree(
        &self,
        base_tree: &str,
        path: &str,
        content: &str,
    ) -> Result<String, HostError> {
        let url = self.url("git/trees");
        let body = NewTree::single_file(base_tree, path, content);
        let created: CreatedObject = self.post_json(&url, &body, "tree").await?;
        debug!(sha = %created.sha, base = %base_tree, "created tree");
        Ok(created.sha)
    }

    /// Create a commit with exactly one parent; returns its sha
    pub async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String, HostError> {
        let url = self.url("git/commits");
        let body = NewCommit {
            message,
            tree,
            parents: vec![parent],
        };
        let created: CreatedObject = self.post_json(&url, &body, "commit").await?;
        debug!(sha = %created.sha, parent = %parent, "created commit");
        Ok(created.sha)
    }

    /// Advance the branch reference to `sha`. The service only accepts
    /// fast-forward updates here; anything else surfaces as a conflict.
    pub async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let url = self.url(&format!("git/refs/heads/{branch}"));
        let resp = self
            .request(Method::PATCH, &url)
            .json(&UpdateRef { sha })
            .send()
            .await?;
        check(resp, &format!("branch {branch}"), Call::RefUpdate).await?;
        debug!(branch = %branch, sha = %sha, "branch advanced");
        Ok(())
    }

    fn url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_root, self.owner, self.repo, tail)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, HostError> {
        let resp = self.request(Method::GET, url).send().await?;
        let resp = check(resp, what, Call::Read).await?;
        Ok(resp.json().await?)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        what: &str,
    ) -> Result<T, HostError> {
        let resp = self.request(Method::POST, url).json(body).send().await?;
        let resp = check(resp, what, Call::Read).await?;
        Ok(resp.json().await?)
    }
}

/// Classify a non-success status into the publisher's failure modes
async fn check(resp: Response, what: &str, call: Call) -> Result<Response, HostError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HostError::Auth,
        StatusCode::NOT_FOUND => HostError::NotFound(what.to_string()),
        StatusCode::CONFLICT => HostError::Conflict(what.to_string()),
        StatusCode::UNPROCESSABLE_ENTITY if matches!(call, Call::RefUpdate) => {
            HostError::Conflict(what.to_string())
        }
        _ => HostError::Api {
            status: status.as_u16(),
            message: resp.text().await.unwrap_or_default(),
        },
    })
}

#[cfg(test)]
mod tests {
    use libsprig_core::config::PartialConfig;
    use libsprig_core::Config;

    use super::*;

    fn test_config(api_root: &str) -> Config {
        PartialConfig {
            token: Some("t0ken".to_string()),
            owner: Some("someone".to_string()),
            repo: Some("greenhouse".to_string()),
            file: Some("hi.md".to_string()),
            schedule: Some("0 * * * *".to_string()),
            github_api: Some(api_root.to_string()),
            ..Default::default()
        }
        .finish()
        .unwrap()
    }

    #[test]
    fn builds_repository_urls() {
        let client = GitHubClient::new(&test_config("https://api.github.com")).unwrap();
        assert_eq!(
            client.url("git/trees"),
            "https://api.github.com/repos/someone/greenhouse/git/trees"
        );
        assert_eq!(
            client.url("git/refs/heads/main"),
            "https://api.github.com/repos/someone/greenhouse/git/refs/heads/main"
        );
    }

    #[test]
    fn trims_trailing_slash_from_api_root() {
        let client = GitHubClient::new(&test_config("http://localhost:8080/")).unwrap();
        assert_eq!(
            client.url("contents/hi.md"),
            "http://localhost:8080/repos/someone/greenhouse/contents/hi.md"
        );
    }
}
