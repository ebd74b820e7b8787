use std::path::{Path, PathBuf};

use themeloc_tree::Node;
use thiserror::Error;

/// Fatal for the affected document kind's pass; other kinds keep going.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed locale document {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("locale document {} is not a JSON object at the top level", .path.display())]
    NotAnObject { path: PathBuf },
    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and parses one locale document.
pub fn read_tree(path: &Path) -> Result<Node, StorageError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tree: Node = serde_json::from_str(&raw).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !tree.is_branch() {
        return Err(StorageError::NotAnObject {
            path: path.to_path_buf(),
        });
    }
    Ok(tree)
}

/// Like `read_tree`, but a missing file is an empty tree. First-run
/// snapshots and brand-new target languages start from nothing; anything
/// unreadable or malformed is still an error.
pub fn read_tree_or_empty(path: &Path) -> Result<Node, StorageError> {
    if !path.exists() {
        return Ok(Node::empty());
    }
    read_tree(path)
}

/// Writes the tree sorted at every level, 2-space indented and
/// newline-terminated.
pub fn write_tree(path: &Path, tree: &Node) -> Result<(), StorageError> {
    let sorted = themeloc_tree::sort_keys(tree);
    let mut body =
        serde_json::to_string_pretty(&sorted).map_err(|source| StorageError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    body.push('\n');
    std::fs::write(path, body).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
