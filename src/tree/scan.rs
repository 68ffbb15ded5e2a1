//! Directory scanning and deterministic linearization
//!
//! Walks the subtree under the texture root, collecting every directory plus
//! all files on the image allow-list. Discovery happens in whatever order
//! the filesystem yields entries; the output order comes from a separate
//! linearization pass over a parent→children adjacency map, so two scans of
//! an unchanged tree always produce the same sequence.
//!
//! Output order per folder: direct file children sorted by name, then
//! subfolders sorted by name, each expanded depth-first. Root-level files
//! lead the sequence, followed by root-level folders.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::node::{is_image_extension, Node, NodeKind};

/// Error type for scan operations
#[derive(Debug)]
pub enum ScanError {
    /// Root path missing or not a directory
    DirectoryNotFound(PathBuf),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::DirectoryNotFound(path) => {
                write!(f, "directory not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Direct children of one folder, collected during the walk
#[derive(Debug, Default)]
struct FolderChildren {
    files: Vec<String>,
    folders: Vec<String>,
}

/// Scan the subtree under `root` and return the ordered node sequence.
///
/// Every directory becomes exactly one Folder node; files are restricted to
/// the image allow-list. Entries with non-UTF-8 names are skipped, as are
/// symlinks.
pub fn scan(root: &Path) -> Result<Vec<Node>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound(root.to_path_buf()));
    }

    // Pass 1: adjacency map keyed by parent path ("" = root)
    let mut children: BTreeMap<String, FolderChildren> = BTreeMap::new();
    children.insert(String::new(), FolderChildren::default());

    for entry in WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let rel_path = match relative_path_string(rel) {
            Some(p) => p,
            None => continue,
        };
        let (parent, name) = split_parent(&rel_path);
        let parent = parent.to_string();
        let name = name.to_string();

        if entry.file_type().is_dir() {
            children.entry(rel_path).or_default();
            children.entry(parent).or_default().folders.push(name);
        } else if entry.file_type().is_file() && has_image_extension(&rel_path) {
            children.entry(parent).or_default().files.push(name);
        }
    }

    // Pass 2: deterministic linearization, files before subfolders per parent
    let mut nodes = Vec::new();
    emit_children(&children, "", 0, &mut nodes);
    Ok(nodes)
}

fn emit_children(
    children: &BTreeMap<String, FolderChildren>,
    parent: &str,
    depth: usize,
    out: &mut Vec<Node>,
) {
    let entry = match children.get(parent) {
        Some(entry) => entry,
        None => return,
    };

    let mut files = entry.files.clone();
    files.sort();
    for name in files {
        out.push(Node {
            path: join_path(parent, &name),
            name,
            kind: NodeKind::File,
            depth,
            parent_path: parent.to_string(),
        });
    }

    let mut folders = entry.folders.clone();
    folders.sort();
    for name in folders {
        let path = join_path(parent, &name);
        out.push(Node {
            name,
            path: path.clone(),
            kind: NodeKind::Folder,
            depth,
            parent_path: parent.to_string(),
        });
        emit_children(children, &path, depth + 1, out);
    }
}

/// Relative path with `/` separators; None when a component is not UTF-8
fn relative_path_string(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_str()?);
    }
    Some(parts.join("/"))
}

fn has_image_extension(rel_path: &str) -> bool {
    Path::new(rel_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(is_image_extension)
        .unwrap_or(false)
}

fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
