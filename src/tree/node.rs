//! Tree node model
//!
//! Nodes are plain data handed to the view layer. The scanner guarantees
//! that every parent folder appears earlier in the sequence than its
//! children, so a renderer can walk the list top to bottom without lookups.

use serde::{Deserialize, Serialize};

/// Image extensions recognized by the indexer (lowercase, without dot)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tga", "webp", "exr", "hdr",
];

/// Whether an extension (any case, without dot) is a recognized image type
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
}

/// Kind of tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    File,
}

/// One filesystem entry inside the indexed subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Display label (final path component)
    pub name: String,
    /// Path relative to the indexed root, `/`-separated on all platforms
    pub path: String,
    /// Folder or file
    pub kind: NodeKind,
    /// Number of ancestor folders (root-level entries are 0)
    pub depth: usize,
    /// Relative path of the enclosing folder; empty for root-level entries
    pub parent_path: String,
}

impl Node {
    /// Whether this node is a folder
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}
