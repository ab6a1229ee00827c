//! Commit publisher - the per-tick pipeline
//!
//! Each iteration chains five dependent remote calls: read the branch tip,
//! fetch random content, build a tree on the tip commit's tree, build a
//! commit whose single parent is that tip, and fast-forward the branch. The
//! tip is re-read at the start of every iteration, never cached, so the
//! iterations of one tick form a strictly linear chain of commits.

use rand::Rng;
use tracing::{debug, info};

use libsprig_poke::{MAX_ID, MIN_ID};

use crate::error::DaemonError;
use crate::service::{ContentSource, GitData};

/// Commits created by one tick
#[derive(Debug, Default)]
pub struct TickReport {
    /// Shas the branch was advanced to, in order
    pub commits: Vec<String>,
}

/// Publishes synthetic commits onto one branch of one repository
pub struct Publisher<H, C> {
    host: H,
    content: C,
    branch: String,
    file: String,
}

impl<H: GitData, C: ContentSource> Publisher<H, C> {
    pub fn new(host: H, content: C, branch: String, file: String) -> Self {
        Self {
            host,
            content,
            branch,
            file,
        }
    }

    /// Run one tick of `count` iterations. The first error aborts the
    /// remaining iterations; commits already pushed stay on the branch, and
    /// objects created after the last push stay orphaned on the remote.
    pub async fn run_tick(&self, count: u32) -> Result<TickReport, DaemonError> {
        let mut report = TickReport::default();
        for iteration in 1..=count {
            let sha = self.publish_one().await?;
            info!(iteration, of = count, commit = %sha, "published commit");
            report.commits.push(sha);
        }
        Ok(report)
    }

    /// One read-fetch-build-build-advance iteration; returns the new tip sha
    async fn publish_one(&self) -> Result<String, DaemonError> {
        let tip = self.host.branch_tip(&self.branch).await?;
        let base_tree = self.host.commit_tree(&tip).await?;

        let id = rand::thread_rng().gen_range(MIN_ID..=MAX_ID);
        let fetched = self.content.fetch(id).await?;
        debug!(id, name = %fetched.name, "fetched content");
        let previous = self.host.file_contents(&self.file).await?;
        let body = fetched.compose(&previous);

        let tree = self.host.create_tree(&base_tree, &self.file, &body).await?;
        let commit = self
            .host
            .create_commit(&fetched.commit_message(), &tree, &tip)
            .await?;
        self.host.update_ref(&self.branch, &commit).await?;
        Ok(commit)
    }
}
