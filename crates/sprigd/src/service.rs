//! Trait seams over the two remote collaborators
//!
//! The publisher talks to the hosting service and the content API through
//! these traits so the per-tick pipeline can be exercised against in-process
//! fakes.

use async_trait::async_trait;

use libsprig_core::FetchedContent;
use libsprig_github::{GitHubClient, HostError};
use libsprig_poke::{PokeClient, PokeError};

/// Git-data operations of the hosting service
#[async_trait]
pub trait GitData: Send + Sync {
    /// Sha of the commit the branch currently points at
    async fn branch_tip(&self, branch: &str) -> Result<String, HostError>;

    /// Tree sha of the given commit
    async fn commit_tree(&self, sha: &str) -> Result<String, HostError>;

    /// Decoded text of the tracked file, read through the contents endpoint
    async fn file_contents(&self, path: &str) -> Result<String, HostError>;

    /// Create a tree replacing one file on top of `base_tree`; returns its sha
    async fn create_tree(
        &self,
        base_tree: &str,
        path: &str,
        content: &str,
    ) -> Result<String, HostError>;

    /// Create a commit with exactly one parent; returns its sha
    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String, HostError>;

    /// Fast-forward the branch reference to `sha`
    async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError>;
}

#[async_trait]
impl GitData for GitHubClient {
    async fn branch_tip(&self, branch: &str) -> Result<String, HostError> {
        Ok(self.branch_ref(branch).await?.object.sha)
    }

    async fn commit_tree(&self, sha: &str) -> Result<String, HostError> {
        Ok(self.commit(sha).await?.tree.sha)
    }

    async fn file_contents(&self, path: &str) -> Result<String, HostError> {
        GitHubClient::file_contents(self, path).await
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        path: &str,
        content: &str,
    ) -> Result<String, HostError> {
        GitHubClient::create_tree(self, base_tree, path, content).await
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String, HostError> {
        GitHubClient::create_commit(self, message, tree, parent).await
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        GitHubClient::update_ref(self, branch, sha).await
    }
}

/// Source of the random content carried by each commit
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the resource with the given id
    async fn fetch(&self, id: u32) -> Result<FetchedContent, PokeError>;
}

#[async_trait]
impl ContentSource for PokeClient {
    async fn fetch(&self, id: u32) -> Result<FetchedContent, PokeError> {
        Ok(self.pokemon(id).await?.into())
    }
}
