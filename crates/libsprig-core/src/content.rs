//! Composition of fetched content into file bodies and commit messages
//!
//! The rendered body is layered in front of the tracked file's previous
//! contents: `<image-markdown-or-empty><br><name><br><previous>`. The image
//! segment is empty when the fetched resource has no sprite.

/// Ephemeral content drawn from the content API for a single commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedContent {
    /// Display name of the fetched resource
    pub name: String,
    /// Sprite URL, absent for resources without one
    pub image_url: Option<String>,
}

impl FetchedContent {
    /// Markdown image reference, or the empty string when no image exists
    pub fn image_markdown(&self) -> String {
        match &self.image_url {
            Some(url) => format!("![{0} picture]({1} '{0} picture')", self.name, url),
            None => String::new(),
        }
    }

    /// New body for the tracked file, layered over its previous contents
    pub fn compose(&self, previous: &str) -> String {
        format!("{}<br>{}<br>{}", self.image_markdown(), self.name, previous)
    }

    /// Message carried by the commit created for this content
    pub fn commit_message(&self) -> String {
        format!("{} said Hi !", self.name)
    }
}
