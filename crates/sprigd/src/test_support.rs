//! In-process fakes for the service traits, shared by publisher and
//! scheduler tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use libsprig_core::FetchedContent;
use libsprig_github::HostError;
use libsprig_poke::PokeError;

use crate::service::{ContentSource, GitData};

/// One recorded `create_commit` call
#[derive(Debug, Clone)]
pub struct CommitRec {
    pub sha: String,
    pub parent: String,
    pub tree: String,
    pub message: String,
}

/// One recorded `create_tree` call
#[derive(Debug, Clone)]
pub struct TreeRec {
    pub sha: String,
    pub base: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct HostState {
    pub tip: String,
    pub commits: Vec<CommitRec>,
    pub trees: Vec<TreeRec>,
    pub ref_updates: usize,
    /// 1-based ref update index that fails with a conflict
    pub fail_update_at: Option<usize>,
    pub file: String,
}

/// In-memory stand-in for the hosting service
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

impl FakeHost {
    pub fn new(tip: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                tip: tip.to_string(),
                file: "hello".to_string(),
                ..Default::default()
            })),
        }
    }

    /// Fake whose `nth` ref update (1-based) fails with a conflict
    pub fn failing_update(tip: &str, nth: usize) -> Self {
        let fake = Self::new(tip);
        fake.state.lock().unwrap().fail_update_at = Some(nth);
        fake
    }

    /// Handle onto the recorded state, for assertions after a run
    pub fn state(&self) -> Arc<Mutex<HostState>> {
        Arc::clone(&self.state)
    }
}

#[async_trait]
impl GitData for FakeHost {
    async fn branch_tip(&self, _branch: &str) -> Result<String, HostError> {
        Ok(self.state.lock().unwrap().tip.clone())
    }

    async fn commit_tree(&self, sha: &str) -> Result<String, HostError> {
        let st = self.state.lock().unwrap();
        match st.commits.iter().find(|c| c.sha == sha) {
            Some(commit) => Ok(commit.tree.clone()),
            // Commits that predate the fake, e.g. the initial tip
            None => Ok(format!("tree-of-{sha}")),
        }
    }

    async fn file_contents(&self, _path: &str) -> Result<String, HostError> {
        Ok(self.state.lock().unwrap().file.clone())
    }

    async fn create_tree(
        &self,
        base_tree: &str,
        path: &str,
        content: &str,
    ) -> Result<String, HostError> {
        let mut st = self.state.lock().unwrap();
        let sha = format!("tree-{}", st.trees.len() + 1);
        st.trees.push(TreeRec {
            sha: sha.clone(),
            base: base_tree.to_string(),
            path: path.to_string(),
            content: content.to_string(),
        });
        Ok(sha)
    }

    async fn create_commit(
        &self,
        message: &str,
        tree: &str,
        parent: &str,
    ) -> Result<String, HostError> {
        let mut st = self.state.lock().unwrap();
        let sha = format!("commit-{}", st.commits.len() + 1);
        st.commits.push(CommitRec {
            sha: sha.clone(),
            parent: parent.to_string(),
            tree: tree.to_string(),
            message: message.to_string(),
        });
        Ok(sha)
    }

    async fn update_ref(&self, _branch: &str, sha: &str) -> Result<(), HostError> {
        let mut st = self.state.lock().unwrap();
        st.ref_updates += 1;
        if st.fail_update_at == Some(st.ref_updates) {
            return Err(HostError::Conflict("tip moved concurrently".to_string()));
        }
        st.tip = sha.to_string();
        Ok(())
    }
}

/// Content source returning a fixed resource
pub struct FakeContent {
    name: String,
    image_url: Option<String>,
}

impl FakeContent {
    pub fn new(name: &str, image_url: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            image_url: image_url.map(String::from),
        }
    }
}

#[async_trait]
impl ContentSource for FakeContent {
    async fn fetch(&self, _id: u32) -> Result<FetchedContent, PokeError> {
        Ok(FetchedContent {
            name: self.name.clone(),
            image_url: self.image_url.clone(),
        })
    }
}
