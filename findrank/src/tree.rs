//! Flattens a file tree into the candidate list used by quick-open.
//!
//! The tree comes from whoever owns the workspace view and is trusted to be
//! acyclic. Flattening walks it depth-first with an explicit stack so very
//! deep trees cannot exhaust the call stack.
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Whether a node is a file or a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Folder,
}

/// A node in the workspace file tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Name shown for this node (last path component)
    pub name: String,
    /// Full path of this node, slash separated
    pub path: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<FileNode>,
}

/// A searchable entry produced by [`flatten`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateEntry {
    pub path: String,
    pub display_name: String,
    /// Number of folders between the tree root and this entry
    pub depth: usize,
}

impl CandidateEntry {
    pub fn new(path: impl Into<String>, display_name: impl Into<String>, depth: usize) -> Self {
        Self {
            path: path.into(),
            display_name: display_name.into(),
            depth,
        }
    }

    /// Builds an entry from a bare path, using its last component as the name
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let display_name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let depth = path.matches('/').count();
        Self {
            path,
            display_name,
            depth,
        }
    }
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder,
            children,
        }
    }

    /// Builds a forest from slash-separated relative file paths.
    ///
    /// Folders are created the first time a path passes through them and
    /// children keep the order in which they were first seen, so a sorted
    /// input produces a sorted tree.
    pub fn from_paths<I, S>(paths: I) -> Vec<FileNode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roots: Vec<FileNode> = Vec::new();

        for path in paths {
            let path = path.as_ref().replace('\\', "/");
            if path.ends_with('/') {
                continue;
            }
            let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
            let Some((file_name, folders)) = components.split_last() else {
                continue;
            };

            let mut level = &mut roots;
            let mut prefix = String::new();
            for folder in folders {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(folder);

                let index = match level
                    .iter()
                    .position(|n| n.kind == NodeKind::Folder && n.name == *folder)
                {
                    Some(index) => index,
                    None => {
                        level.push(FileNode::folder(*folder, prefix.clone(), Vec::new()));
                        level.len() - 1
                    }
                };
                level = &mut level[index].children;
            }

            let full_path = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{}/{}", prefix, file_name)
            };
            level.push(FileNode::file(*file_name, full_path));
        }

        roots
    }
}

/// Flattens a forest into its files, depth-first in tree order.
///
/// Folders are traversed but contribute no entries. Top-level nodes have
/// depth 0.
pub fn flatten(roots: &[FileNode]) -> Vec<CandidateEntry> {
    let mut entries = Vec::new();
    // Children are pushed in reverse so they pop in tree order.
    let mut stack: Vec<(&FileNode, usize)> = roots.iter().rev().map(|n| (n, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        match node.kind {
            NodeKind::File => entries.push(CandidateEntry {
                path: node.path.clone(),
                display_name: node.name.clone(),
                depth,
            }),
            NodeKind::Folder => {
                stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
            }
        }
    }

    trace!("Flattened tree into {} entries", entries.len());
    entries
}
