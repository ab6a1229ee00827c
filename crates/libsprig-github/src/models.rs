//! Wire models for the git-data and contents endpoints
//!
//! Only the fields the publisher reads are modelled; everything else in the
//! responses is ignored.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Mode for a regular, non-executable file entry
pub const FILE_MODE: &str = "100644";

/// `GET git/refs/heads/{branch}` response
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: RefTarget,
}

/// Object a reference points at
#[derive(Debug, Clone, Deserialize)]
pub struct RefTarget {
    pub sha: String,
}

/// `GET git/commits/{sha}` response
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub tree: TreeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeRef {
    pub sha: String,
}

/// `POST git/trees` request body
#[derive(Debug, Serialize)]
pub struct NewTree<'a> {
    pub base_tree: &'a str,
    pub tree: Vec<TreeEntry<'a>>,
}

/// Single file replacement layered on the base tree
#[derive(Debug, Serialize)]
pub struct TreeEntry<'a> {
    pub path: &'a str,
    pub mode: &'a str,
    #[serde(rename = "type")]
    pub entry_type: &'a str,
    pub content: &'a str,
}

impl<'a> NewTree<'a> {
    /// Tree replacing exactly one regular file; every other path is carried
    /// over unchanged through `base_tree`.
    pub fn single_file(base_tree: &'a str, path: &'a str, content: &'a str) -> Self {
        Self {
            base_tree,
            tree: vec![TreeEntry {
                path,
                mode: FILE_MODE,
                entry_type: "blob",
                content,
            }],
        }
    }
}

/// `POST git/commits` request body
#[derive(Debug, Serialize)]
pub struct NewCommit<'a> {
    pub message: &'a str,
    pub tree: &'a str,
    pub parents: Vec<&'a str>,
}

/// `PATCH git/refs/heads/{branch}` request body
///
/// `force` is deliberately absent: the service then refuses anything that is
/// not a fast-forward, which is the conflict signal the publisher relies on.
#[derive(Debug, Serialize)]
pub struct UpdateRef<'a> {
    pub sha: &'a str,
}

/// Object creation response (`POST git/trees`, `POST git/commits`)
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedObject {
    pub sha: String,
}

/// `GET contents/{path}` response
#[derive(Debug, Clone, Deserialize)]
pub struct FileContents {
    pub content: String,
    pub encoding: String,
}

impl FileContents {
    /// Decode the payload to text. The service base64-encodes contents and
    /// inserts line breaks every 60 characters; whitespace is stripped before
    /// decoding. Non-UTF-8 bytes are replaced rather than rejected.
    pub fn decoded(&self) -> Result<String, HostError> {
        if self.encoding != "base64" {
            return Err(HostError::Decode(format!(
                "unsupported encoding {:?}",
                self.encoding
            )));
        }
        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|e| HostError::Decode(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_branch_ref() {
        let json = r#"{
            "ref": "refs/heads/main",
            "node_id": "REF_xyz",
            "url": "https://api.github.com/repos/o/r/git/refs/heads/main",
            "object": {
                "sha": "abc123",
                "type": "commit",
                "url": "https://api.github.com/repos/o/r/git/commits/abc123"
            }
        }"#;
        let branch: BranchRef = serde_json::from_str(json).unwrap();
        assert_eq!(branch.ref_name, "refs/heads/main");
        assert_eq!(branch.object.sha, "abc123");
    }

    #[test]
    fn parses_commit_info() {
        let json = r#"{
            "sha": "abc123",
            "author": {"name": "x", "email": "x@example.com", "date": "2024-01-01T00:00:00Z"},
            "message": "pikachu said Hi !",
            "tree": {"sha": "t456", "url": "https://api.github.com/repos/o/r/git/trees/t456"},
            "parents": []
        }"#;
        let commit: CommitInfo = serde_json::from_str(json).unwrap();
        assert_eq!(commit.sha, "abc123");
        assert_eq!(commit.tree.sha, "t456");
    }

    #[test]
    fn single_file_tree_request_shape() {
        let tree = NewTree::single_file("base789", "hi.md", "body");
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "base_tree": "base789",
                "tree": [{
                    "path": "hi.md",
                    "mode": "100644",
                    "type": "blob",
                    "content": "body"
                }]
            })
        );
    }

    #[test]
    fn commit_request_has_single_parent() {
        let commit = NewCommit {
            message: "pikachu said Hi !",
            tree: "t456",
            parents: vec!["abc123"],
        };
        let value = serde_json::to_value(&commit).unwrap();
        assert_eq!(value["parents"], serde_json::json!(["abc123"]));
    }

    #[test]
    fn update_ref_omits_force() {
        let value = serde_json::to_value(UpdateRef { sha: "abc123" }).unwrap();
        assert_eq!(value, serde_json::json!({"sha": "abc123"}));
    }

    #[test]
    fn decodes_contents_with_embedded_newlines() {
        // "hello" split across lines, as the contents endpoint serves it
        let contents = FileContents {
            content: "aGVs\nbG8=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(contents.decoded().unwrap(), "hello");
    }

    #[test]
    fn rejects_unknown_encoding() {
        let contents = FileContents {
            content: "hello".to_string(),
            encoding: "utf-8".to_string(),
        };
        assert!(matches!(contents.decoded(), Err(HostError::Decode(_))));
    }
}
